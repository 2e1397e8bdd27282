//! GeometryRecord - named attribute store for one parsed input line.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::{InputSchema, OutputSchema, ValueKind};
use crate::error::RecordError;

/// Reserved attribute key the composed feature name is stored under.
///
/// An output schema may reference it like any other string field.
pub const FEATURE_NAME_KEY: &str = "featurename";

/// A tagged attribute value.
///
/// Numeric and text attributes share one key space; a name holds exactly
/// one value of exactly one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

/// Attribute store for one input line.
///
/// Built once from the line via its input schema, then mutated only by
/// the type-specific derivation step. Holds a shared reference to its
/// output schema for the lifetime of the record.
#[derive(Debug, Clone, Serialize)]
pub struct GeometryRecord {
    attrs: HashMap<String, AttrValue>,
    #[serde(skip)]
    output: Arc<OutputSchema>,
}

impl GeometryRecord {
    /// Map the split fields of one line into a record.
    ///
    /// Every declared slot is filled from the field at its index; numeric
    /// slots parse the raw text, text slots store it as-is. The line must
    /// provide at least as many fields as the schema declares slots.
    pub fn from_fields(
        fields: &[&str],
        input: &InputSchema,
        output: Arc<OutputSchema>,
    ) -> Result<Self, RecordError> {
        if fields.len() < input.len() {
            return Err(RecordError::InsufficientFields {
                expected: input.len(),
                got: fields.len(),
            });
        }

        let mut attrs = HashMap::with_capacity(input.len());
        for (slot, field) in input.fields.iter().enumerate() {
            if attrs.contains_key(&field.name) {
                return Err(RecordError::NameCollision {
                    name: field.name.clone(),
                });
            }

            let raw = fields[slot];
            let value = match field.kind {
                ValueKind::Number => {
                    let parsed: f64 =
                        raw.trim().parse().map_err(|_| RecordError::NumericParse {
                            value: raw.to_string(),
                        })?;
                    AttrValue::Number(parsed)
                }
                ValueKind::Text => AttrValue::Text(raw.to_string()),
            };
            attrs.insert(field.name.clone(), value);
        }

        Ok(Self { attrs, output })
    }

    /// Look up a numeric attribute. Text attributes are not visible here.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.attrs.get(name) {
            Some(AttrValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a text attribute. Numeric attributes are not visible here.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.attrs.get(name) {
            Some(AttrValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Add or overwrite a numeric attribute.
    pub fn set_number(&mut self, name: impl Into<String>, value: f64) {
        self.attrs.insert(name.into(), AttrValue::Number(value));
    }

    /// Add or overwrite a text attribute.
    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), AttrValue::Text(value.into()));
    }

    /// Remove an attribute of either kind.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove(name)
    }

    /// Store the composed `prefix_N` feature name under the reserved key.
    pub fn set_feature_name(&mut self, name: impl Into<String>) {
        self.set_text(FEATURE_NAME_KEY, name);
    }

    /// Feature name prefix from the output schema.
    pub fn feature_prefix(&self) -> &str {
        &self.output.feature_name
    }

    /// The output schema this record serializes against.
    pub fn output_schema(&self) -> &OutputSchema {
        &self.output
    }
}
