//! Configuration document loader.
//!
//! Parses the JSON configuration into typed schemas. The document keeps
//! the layout of the reference system: a root object `CSV_CONVERTER`
//! with a `delimiter` attribute and a `TYPE_SETTINGS` object whose keys
//! are type tags, each carrying a `featurename` attribute plus ordered
//! `INPUT` and `OUTPUT` descriptor lists.
//!
//! Loading is all-or-nothing: the first invalid descriptor aborts the
//! load and no partial schema set is returned.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::model::{InputField, InputSchema, OutputField, OutputSchema, TypeSchemas, ValueKind};

/// Parsed configuration: the field delimiter and the schema pair per tag.
#[derive(Debug, Clone)]
pub struct Config {
    /// Single character every input line is split on.
    pub delimiter: char,
    /// Schema pair per type tag.
    pub types: HashMap<String, TypeSchemas>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: ';',
            types: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up the schema pair for a type tag.
    pub fn schemas_for(&self, tag: &str) -> Option<&TypeSchemas> {
        self.types.get(tag)
    }
}

/// Load and parse the configuration document at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parse a configuration document from its text.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let doc: Value = serde_json::from_str(text)?;

    let root = doc.get("CSV_CONVERTER").ok_or_else(|| {
        ConfigError::schema("document does not contain the root object \"CSV_CONVERTER\"")
    })?;

    // Only the first character of the configured delimiter is used.
    let delimiter_str = str_attr(root, "delimiter", Some(";"))?;
    let delimiter = delimiter_str
        .chars()
        .next()
        .ok_or_else(|| ConfigError::schema("the \"delimiter\" attribute must not be empty"))?;

    let type_settings = root
        .get("TYPE_SETTINGS")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ConfigError::schema("root object does not contain the \"TYPE_SETTINGS\" object")
        })?;

    let mut types = HashMap::new();
    for (tag, node) in type_settings {
        let feature_name = str_attr(node, "featurename", None)
            .map_err(|e| ConfigError::schema(format!("type \"{tag}\": {e}")))?;

        let input = parse_input_section(node, tag)?;
        let output = parse_output_section(node, tag, feature_name)?;

        let schemas = TypeSchemas {
            input,
            output: Arc::new(output),
        };
        if types.insert(tag.clone(), schemas).is_some() {
            return Err(ConfigError::schema(format!(
                "configuration settings of the type \"{tag}\" are not unique"
            )));
        }
    }

    Ok(Config { delimiter, types })
}

/// Parse the ordered `INPUT` descriptor list of one type.
fn parse_input_section(node: &Value, tag: &str) -> Result<InputSchema, ConfigError> {
    let list = node.get("INPUT").and_then(Value::as_array).ok_or_else(|| {
        ConfigError::schema(format!("type \"{tag}\" does not contain an \"INPUT\" list"))
    })?;

    let mut slots: Vec<Option<InputField>> = vec![None; list.len()];
    for desc in list {
        let id = slot_id(desc, list.len(), tag, "INPUT")?;
        let name = str_attr(desc, "name", None)
            .map_err(|e| ConfigError::schema(format!("type \"{tag}\", INPUT id {id}: {e}")))?;
        let kind = ValueKind::from_type_str(&str_attr(desc, "type", Some("double"))?);

        if slots[id].is_some() {
            return Err(ConfigError::schema(format!(
                "duplicate id {id} in the \"INPUT\" list of type \"{tag}\""
            )));
        }
        slots[id] = Some(InputField { name, kind });
    }

    // Distinct in-range ids over a list of equal length fill every slot.
    let fields = slots.into_iter().collect::<Option<Vec<_>>>().ok_or_else(|| {
        ConfigError::schema(format!("the \"INPUT\" ids of type \"{tag}\" leave a slot unassigned"))
    })?;
    Ok(InputSchema { fields })
}

/// Parse the ordered `OUTPUT` descriptor list of one type.
fn parse_output_section(
    node: &Value,
    tag: &str,
    feature_name: String,
) -> Result<OutputSchema, ConfigError> {
    let list = node.get("OUTPUT").and_then(Value::as_array).ok_or_else(|| {
        ConfigError::schema(format!("type \"{tag}\" does not contain an \"OUTPUT\" list"))
    })?;

    let mut slots: Vec<Option<OutputField>> = vec![None; list.len()];
    for desc in list {
        let id = slot_id(desc, list.len(), tag, "OUTPUT")?;
        let name = str_attr(desc, "name", None)
            .map_err(|e| ConfigError::schema(format!("type \"{tag}\", OUTPUT id {id}: {e}")))?;
        let kind = ValueKind::from_type_str(&str_attr(desc, "type", Some("double"))?);
        let default = str_attr(desc, "default", Some(""))?;
        let decimal_digits = decimal_digits_attr(desc)?;

        if slots[id].is_some() {
            return Err(ConfigError::schema(format!(
                "duplicate id {id} in the \"OUTPUT\" list of type \"{tag}\""
            )));
        }
        slots[id] = Some(OutputField {
            name,
            kind,
            default,
            decimal_digits,
        });
    }

    let fields = slots.into_iter().collect::<Option<Vec<_>>>().ok_or_else(|| {
        ConfigError::schema(format!(
            "the \"OUTPUT\" ids of type \"{tag}\" leave a slot unassigned"
        ))
    })?;
    Ok(OutputSchema {
        feature_name,
        fields,
    })
}

/// Read the required `id` attribute of a descriptor and range-check it.
fn slot_id(desc: &Value, len: usize, tag: &str, section: &str) -> Result<usize, ConfigError> {
    let raw = desc.get("id").ok_or_else(|| {
        ConfigError::schema(format!(
            "could not find the attribute \"id\" in a \"{section}\" descriptor of type \"{tag}\""
        ))
    })?;
    let id = raw
        .as_i64()
        .ok_or_else(|| ConfigError::schema(format!("unable to convert {raw} to an integer")))?;
    if id < 0 || id as usize >= len {
        return Err(ConfigError::schema(format!("the id {id} is out of range")));
    }
    Ok(id as usize)
}

/// Read the optional `decimaldigits` attribute (default 0, non-negative).
fn decimal_digits_attr(desc: &Value) -> Result<u32, ConfigError> {
    match desc.get("decimaldigits") {
        None => Ok(0),
        Some(raw) => {
            let digits = raw.as_u64().ok_or_else(|| {
                ConfigError::schema(format!(
                    "unable to convert {raw} to a non-negative integer"
                ))
            })?;
            Ok(digits as u32)
        }
    }
}

/// Read a string attribute, falling back to `default` when it is absent.
///
/// Passing `None` as the default makes the attribute required.
fn str_attr(node: &Value, key: &str, default: Option<&str>) -> Result<String, ConfigError> {
    match node.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ConfigError::schema(format!(
            "the attribute \"{key}\" is not a string: {other}"
        ))),
        None => match default {
            Some(d) => Ok(d.to_string()),
            None => Err(ConfigError::schema(format!(
                "could not find the attribute \"{key}\""
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal_type(featurename: &str) -> String {
        format!(
            r#"{{
                "featurename": "{featurename}",
                "INPUT": [
                    {{"id": 0, "name": "type", "type": "string"}},
                    {{"id": 1, "name": "X"}}
                ],
                "OUTPUT": [
                    {{"id": 0, "name": "featurename", "type": "string"}},
                    {{"id": 1, "name": "X", "decimaldigits": 3, "default": "0"}}
                ]
            }}"#
        )
    }

    fn wrap(delimiter: Option<&str>, types: &str) -> String {
        match delimiter {
            Some(d) => format!(
                r#"{{"CSV_CONVERTER": {{"delimiter": "{d}", "TYPE_SETTINGS": {{{types}}}}}}}"#
            ),
            None => format!(r#"{{"CSV_CONVERTER": {{"TYPE_SETTINGS": {{{types}}}}}}}"#),
        }
    }

    #[test]
    fn test_parse_minimal_config() {
        let text = wrap(Some(","), &format!(r#""PLN": {}"#, minimal_type("PLN")));
        let config = parse_config(&text).unwrap();

        assert_eq!(config.delimiter, ',');
        let schemas = config.schemas_for("PLN").expect("PLN registered");
        assert_eq!(schemas.input.len(), 2);
        assert_eq!(schemas.input.fields[0].name, "type");
        assert_eq!(schemas.input.fields[0].kind, ValueKind::Text);
        assert_eq!(schemas.input.fields[1].kind, ValueKind::Number);
        assert_eq!(schemas.output.feature_name, "PLN");
        assert_eq!(schemas.output.fields[1].decimal_digits, 3);
        assert_eq!(schemas.output.fields[1].default, "0");
    }

    #[test]
    fn test_delimiter_defaults_to_semicolon() {
        let text = wrap(None, &format!(r#""PLN": {}"#, minimal_type("PLN")));
        let config = parse_config(&text).unwrap();
        assert_eq!(config.delimiter, ';');
    }

    #[test]
    fn test_delimiter_takes_first_character_only() {
        let text = wrap(Some("||"), &format!(r#""PLN": {}"#, minimal_type("PLN")));
        let config = parse_config(&text).unwrap();
        assert_eq!(config.delimiter, '|');
    }

    #[test]
    fn test_empty_delimiter_is_schema_error() {
        let text = wrap(Some(""), &format!(r#""PLN": {}"#, minimal_type("PLN")));
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::Schema { .. })
        ));
    }

    #[test]
    fn test_missing_root_is_schema_error() {
        let err = parse_config(r#"{"OTHER": {}}"#).unwrap_err();
        match err {
            ConfigError::Schema { message } => assert!(message.contains("CSV_CONVERTER")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse_config("not json at all"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_featurename_is_schema_error() {
        let text = wrap(
            Some(";"),
            r#""PLN": {"INPUT": [], "OUTPUT": []}"#,
        );
        let err = parse_config(&text).unwrap_err();
        match err {
            ConfigError::Schema { message } => assert!(message.contains("featurename")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_input_section_is_schema_error() {
        let text = wrap(
            Some(";"),
            r#""PLN": {"featurename": "PLN", "OUTPUT": []}"#,
        );
        let err = parse_config(&text).unwrap_err();
        match err {
            ConfigError::Schema { message } => assert!(message.contains("INPUT")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_id_is_schema_error() {
        let text = wrap(
            Some(";"),
            r#""PLN": {
                "featurename": "PLN",
                "INPUT": [{"id": "zero", "name": "type", "type": "string"}],
                "OUTPUT": []
            }"#,
        );
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::Schema { .. })
        ));
    }

    #[test]
    fn test_out_of_range_id_is_schema_error() {
        let text = wrap(
            Some(";"),
            r#""PLN": {
                "featurename": "PLN",
                "INPUT": [{"id": 1, "name": "type", "type": "string"}],
                "OUTPUT": []
            }"#,
        );
        let err = parse_config(&text).unwrap_err();
        match err {
            ConfigError::Schema { message } => assert!(message.contains("out of range")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_id_is_schema_error() {
        let text = wrap(
            Some(";"),
            r#""PLN": {
                "featurename": "PLN",
                "INPUT": [
                    {"id": 0, "name": "type", "type": "string"},
                    {"id": 0, "name": "X"}
                ],
                "OUTPUT": []
            }"#,
        );
        let err = parse_config(&text).unwrap_err();
        match err {
            ConfigError::Schema { message } => assert!(message.contains("duplicate id 0")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_decimaldigits_is_schema_error() {
        let text = wrap(
            Some(";"),
            r#""PLN": {
                "featurename": "PLN",
                "INPUT": [],
                "OUTPUT": [{"id": 0, "name": "X", "decimaldigits": -1}]
            }"#,
        );
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::Schema { .. })
        ));
    }

    #[test]
    fn test_input_ids_may_arrive_out_of_order() {
        let text = wrap(
            Some(";"),
            r#""PLN": {
                "featurename": "PLN",
                "INPUT": [
                    {"id": 1, "name": "X"},
                    {"id": 0, "name": "type", "type": "string"}
                ],
                "OUTPUT": []
            }"#,
        );
        let config = parse_config(&text).unwrap();
        let input = &config.schemas_for("PLN").unwrap().input;
        assert_eq!(input.fields[0].name, "type");
        assert_eq!(input.fields[1].name, "X");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
