//! Conversion driver: file load, record dispatch and output write.

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{self, Config};
use crate::derive::{DeriveFn, DeriveRegistry};
use crate::error::{ConfigError, ConvertError, ParseError};
use crate::generator::{generate_output, OutputHeader};
use crate::model::GeometryRecord;

/// One parsed input line: the resolved type tag and its record.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedRecord {
    pub tag: String,
    pub record: GeometryRecord,
}

/// Schema-driven converter from delimited geometry lines to CALIGO rows.
///
/// Owns the loaded configuration, the derivation registry and the records
/// of the currently opened file. `open_and_parse` and `convert` are each
/// all-or-nothing with respect to the state they touch.
#[derive(Debug)]
pub struct CsvConverter {
    config: Config,
    registry: DeriveRegistry,
    records: Vec<ParsedRecord>,
}

impl Default for CsvConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConverter {
    /// Converter with the built-in derivations and no schemas loaded.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            registry: DeriveRegistry::with_builtins(),
            records: Vec::new(),
        }
    }

    /// Load the configuration document at `path`.
    pub fn load_config(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config = config::load_config(path)?;
        info!(
            "loaded {} type schema(s), delimiter '{}'",
            self.config.types.len(),
            self.config.delimiter
        );
        Ok(())
    }

    /// Replace the configuration with an already-parsed one.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Register a derivation routine for a type tag.
    ///
    /// Together with a configuration entry this is all a new geometry
    /// type needs; the driver itself never changes.
    pub fn register_derivation(&mut self, tag: impl Into<String>, derive: DeriveFn) {
        self.registry.register(tag, derive);
    }

    /// Records of the currently opened file, in file order.
    pub fn records(&self) -> &[ParsedRecord] {
        &self.records
    }

    /// Open a text file and parse every line into a record.
    ///
    /// The previously loaded records are dropped first. Any per-line
    /// failure aborts the pass and leaves zero records loaded; the error
    /// embeds the offending line's literal text.
    pub fn open_and_parse(&mut self, path: &Path) -> Result<(), ParseError> {
        self.records.clear();

        let content = fs::read_to_string(path)?;
        let mut records = Vec::new();
        for raw_line in content.lines() {
            let line = raw_line.trim_end_matches('\r');
            if line.is_empty() {
                debug!("skipping empty line");
                continue;
            }
            records.push(self.parse_line(line)?);
        }

        info!("parsed {} record(s) from {}", records.len(), path.display());
        self.records = records;
        Ok(())
    }

    /// Split one line on the delimiter and build its record.
    fn parse_line(&self, line: &str) -> Result<ParsedRecord, ParseError> {
        let fields: Vec<&str> = line.split(self.config.delimiter).collect();

        // the first field selects the geometry type
        let tag = fields[0];
        if !self.registry.contains(tag) {
            return Err(ParseError::UnsupportedType {
                line: line.to_string(),
            });
        }
        let schemas = self
            .config
            .schemas_for(tag)
            .ok_or_else(|| ParseError::MissingTypeConfig {
                tag: tag.to_string(),
            })?;

        let record =
            GeometryRecord::from_fields(&fields, &schemas.input, Arc::clone(&schemas.output))
                .map_err(|source| ParseError::Line {
                    line: line.to_string(),
                    source,
                })?;

        Ok(ParsedRecord {
            tag: tag.to_string(),
            record,
        })
    }

    /// Convert the loaded records and write them to `path`.
    ///
    /// The file content is generated fully in memory first; on any
    /// failure nothing is written.
    pub fn convert(&self, path: &Path, header: &OutputHeader) -> Result<(), ConvertError> {
        let content = generate_output(&self.records, &self.registry, header)?;
        fs::write(path, content)?;
        info!("wrote {}", path.display());
        Ok(())
    }
}
