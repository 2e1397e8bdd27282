//! Error types for CSV to CALIGO conversion.
//!
//! Errors are grouped by pipeline phase: configuration loading,
//! file parsing, and output conversion. All variants carry enough
//! context (offending line, attribute name, raw value) for the
//! message to be surfaced verbatim to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}: {source}")]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("configuration is not well-formed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("configuration schema error: {message}")]
    Schema { message: String },
}

impl ConfigError {
    /// Build a `Schema` error from anything stringly.
    pub fn schema(message: impl Into<String>) -> Self {
        ConfigError::Schema {
            message: message.into(),
        }
    }
}

/// Errors raised while building a single record from one input line.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("line has {got} field(s) but the input schema declares {expected} slot(s)")]
    InsufficientFields { expected: usize, got: usize },

    #[error("unable to convert \"{value}\" to a number")]
    NumericParse { value: String },

    #[error("input name mapping is not unique: \"{name}\" is already mapped")]
    NameCollision { name: String },
}

/// Errors raised by `open_and_parse`.
///
/// Any per-line failure aborts the whole pass; already-parsed records
/// are discarded.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unable to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported geometry type in line \"{line}\"")]
    UnsupportedType { line: String },

    #[error("no schema configured for type \"{tag}\"")]
    MissingTypeConfig { tag: String },

    #[error("creating a geometry from the input \"{line}\" failed: {source}")]
    Line { line: String, source: RecordError },
}

/// Errors raised by type-specific derivation.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("required value \"{key}\" is missing")]
    MissingAttribute { key: String },

    #[error("invalid angle input: tangent is undefined or near zero")]
    InvalidAngle,

    #[error("orientation vector has zero length")]
    DegenerateOrientation,

    #[error("cannot determine a distinct {subject} from the given input")]
    Underdetermined { subject: &'static str },
}

/// Any pipeline failure, for one-shot conversions.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Errors raised by `convert` (output generation and write).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("deriving output attributes failed: {0}")]
    Derive(#[from] DeriveError),

    #[error("default value \"{value}\" for output field \"{name}\" is not numeric")]
    DefaultFormat { name: String, value: String },

    #[error("no derivation registered for type \"{tag}\"")]
    UnregisteredType { tag: String },

    #[error("unable to write output file: {0}")]
    Io(#[from] std::io::Error),
}
