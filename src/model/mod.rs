//! Data model types for CSV to CALIGO conversion.

mod record;
mod schema;

pub use record::{AttrValue, GeometryRecord, FEATURE_NAME_KEY};
pub use schema::{InputField, InputSchema, OutputField, OutputSchema, TypeSchemas, ValueKind};
