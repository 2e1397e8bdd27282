//! Type-specific derivation of output attributes.
//!
//! Each geometry type registers one derivation routine that fills in
//! attributes the raw input does not carry (for example the cone's
//! apex/height reconstruction). The driver dispatches by type tag
//! through [`DeriveRegistry`]; adding a geometry type needs only a
//! configuration entry plus one registered routine.

mod circle;
mod cone;

pub use circle::derive_circle;
pub use cone::derive_cone;

use std::collections::HashMap;

use crate::error::DeriveError;
use crate::model::GeometryRecord;

/// A derivation routine. May add, overwrite or remove attributes.
pub type DeriveFn = fn(&mut GeometryRecord) -> Result<(), DeriveError>;

/// Plane derivation: nothing to calculate.
pub fn derive_plane(_record: &mut GeometryRecord) -> Result<(), DeriveError> {
    Ok(())
}

/// Registry mapping type tags to their derivation routine.
#[derive(Debug, Clone, Default)]
pub struct DeriveRegistry {
    routines: HashMap<String, DeriveFn>,
}

impl DeriveRegistry {
    /// Empty registry with no known types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the reference types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("PLN", derive_plane);
        registry.register("CIR", derive_circle);
        registry.register("CON", derive_cone);
        registry
    }

    /// Register (or replace) the derivation routine for a tag.
    pub fn register(&mut self, tag: impl Into<String>, derive: DeriveFn) {
        self.routines.insert(tag.into(), derive);
    }

    /// Look up the routine for a tag.
    pub fn get(&self, tag: &str) -> Option<DeriveFn> {
        self.routines.get(tag).copied()
    }

    /// Whether a routine is registered for the tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.routines.contains_key(tag)
    }
}

/// Read a required numeric attribute.
pub(crate) fn required_number(record: &GeometryRecord, key: &str) -> Result<f64, DeriveError> {
    record.number(key).ok_or_else(|| DeriveError::MissingAttribute {
        key: key.to_string(),
    })
}

/// Parse a text attribute as a number, treating blank or unparsable
/// values as absent.
pub(crate) fn parse_nonblank(text: Option<&str>) -> Option<f64> {
    let raw = text?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
