//! caligo-convert - Schema-driven conversion of delimited geometry lines
//! into the CALIGO fixed-column format.
//!
//! Input lines carry a leading type tag (`CIR`, `PLN`, `CON`, ...) that
//! selects a configured schema pair: an input schema mapping positional
//! fields to named attributes, and an output schema listing which
//! attributes to emit, with formatting and defaults. A per-type
//! derivation routine fills in attributes the raw input does not carry.
//! Schemas come from a JSON configuration document, so new geometry
//! types need only a configuration entry plus one registered routine.
//!
//! # Example
//!
//! ```no_run
//! use caligo_convert::{CsvConverter, OutputHeader};
//! use std::path::Path;
//!
//! let mut converter = CsvConverter::new();
//! converter.load_config(Path::new("config.json")).unwrap();
//! converter.open_and_parse(Path::new("geometries.csv")).unwrap();
//!
//! let header = OutputHeader::new("map", "model", "user", "name");
//! converter.convert(Path::new("geometries.txt"), &header).unwrap();
//! ```

pub mod config;
pub mod converter;
pub mod derive;
pub mod error;
pub mod generator;
pub mod model;

// Re-exports for convenience
pub use config::{load_config, parse_config, Config};
pub use converter::{CsvConverter, ParsedRecord};
pub use derive::{DeriveFn, DeriveRegistry};
pub use error::{ConfigError, ConvertError, DeriveError, Error, ParseError, RecordError};
pub use generator::OutputHeader;
pub use model::{AttrValue, GeometryRecord, InputSchema, OutputSchema, ValueKind};

use std::path::Path;

/// Run the full pipeline for one file.
///
/// Loads the configuration, parses `input` and writes the converted
/// output to `output`.
pub fn convert_file(
    config_path: &Path,
    input: &Path,
    output: &Path,
    header: &OutputHeader,
) -> Result<(), Error> {
    let mut converter = CsvConverter::new();
    converter.load_config(config_path)?;
    converter.open_and_parse(input)?;
    converter.convert(output, header)?;
    Ok(())
}
