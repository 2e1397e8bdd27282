//! Typed input/output schemas for one geometry type.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of a schema field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueKind {
    /// Numeric field, stored as f64.
    #[default]
    Number,
    /// Free-text field, stored as-is.
    Text,
}

impl ValueKind {
    /// Map a configured `type` attribute to a kind.
    ///
    /// `"double"` selects numeric; every other value is treated as text.
    pub fn from_type_str(s: &str) -> Self {
        if s == "double" {
            ValueKind::Number
        } else {
            ValueKind::Text
        }
    }
}

/// One input slot: the attribute name a CSV column maps to, and its kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputField {
    /// Attribute name the raw field is stored under.
    pub name: String,
    /// How the raw field text is converted.
    pub kind: ValueKind,
}

/// Ordered input layout for one geometry type.
///
/// Fields are stored in slot order: `fields[i]` describes the i-th CSV
/// column of a line (slot 0 is the type tag column). The configuration
/// loader guarantees the declared ids form a permutation of `0..n`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    pub fields: Vec<InputField>,
}

impl InputSchema {
    /// Number of declared slots.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no slots.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One output field: name, kind, fallback default and numeric precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputField {
    /// Attribute name looked up in the record.
    pub name: String,
    /// Kind of the emitted value.
    pub kind: ValueKind,
    /// Fallback used when the attribute is absent after derivation.
    pub default: String,
    /// Fixed-point fractional digits; only meaningful for numeric fields.
    pub decimal_digits: u32,
}

/// Ordered output layout for one geometry type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Feature name prefix; records are named `<prefix>_<n>`.
    pub feature_name: String,
    /// Output fields in emission order.
    pub fields: Vec<OutputField>,
}

impl OutputSchema {
    /// Number of emitted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema emits no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Schema pair registered for one type tag.
///
/// Output schemas are shared read-only with every record of the type.
#[derive(Debug, Clone)]
pub struct TypeSchemas {
    pub input: InputSchema,
    pub output: Arc<OutputSchema>,
}
