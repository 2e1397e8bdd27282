//! CALIGO file generation: header block, feature naming and row output.
//!
//! The whole file is assembled in memory and only written to disk by the
//! caller once generation succeeded, so a failing record never leaves a
//! half-written output file behind.

use chrono::Local;
use std::collections::HashMap;
use std::fmt::Write;

use crate::converter::ParsedRecord;
use crate::derive::DeriveRegistry;
use crate::error::ConvertError;
use crate::model::{GeometryRecord, ValueKind};

/// Header arguments for one conversion run.
///
/// The timestamp is part of the value so a run is a pure function of its
/// inputs; [`OutputHeader::new`] fills in the current local time.
#[derive(Debug, Clone)]
pub struct OutputHeader {
    pub map: String,
    pub model: String,
    pub user: String,
    pub name: String,
    pub timestamp: String,
}

impl OutputHeader {
    /// Header stamped with the current local time.
    pub fn new(
        map: impl Into<String>,
        model: impl Into<String>,
        user: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(
            map,
            model,
            user,
            name,
            Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    }

    /// Header with an explicit timestamp.
    pub fn with_timestamp(
        map: impl Into<String>,
        model: impl Into<String>,
        user: impl Into<String>,
        name: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            map: map.into(),
            model: model.into(),
            user: user.into(),
            name: name.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Per-run counter that makes feature names unique within their prefix.
#[derive(Debug, Default)]
pub struct NameCounter {
    counters: HashMap<String, u32>,
}

impl NameCounter {
    /// Fresh counter; every prefix starts at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a prefix: 1 on first use, incrementing afterwards.
    pub fn next(&mut self, prefix: &str) -> u32 {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Fixed-point formatting with `digits` fractional digits.
///
/// Rust's float formatting always uses `.` as the decimal separator, so
/// the output is independent of the host locale.
pub fn format_number(value: f64, digits: u32) -> String {
    let formatted = format!("{:.*}", digits as usize, value);
    // a negative value that rounds to zero must not print as "-0.000"
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

/// Serialize one derived record into its ordered output fields.
pub fn format_record(record: &GeometryRecord) -> Result<Vec<String>, ConvertError> {
    let schema = record.output_schema();
    let mut row = Vec::with_capacity(schema.len());

    for field in &schema.fields {
        let value = match field.kind {
            ValueKind::Text => match record.text(&field.name) {
                Some(text) => text.to_string(),
                // missing text values fall back to the default verbatim
                None => field.default.clone(),
            },
            ValueKind::Number => match record.number(&field.name) {
                Some(number) => format_number(number, field.decimal_digits),
                None if field.default.trim().is_empty() => field.default.clone(),
                None => match field.default.trim().parse::<f64>() {
                    Ok(number) => format_number(number, field.decimal_digits),
                    Err(_) => {
                        return Err(ConvertError::DefaultFormat {
                            name: field.name.clone(),
                            value: field.default.clone(),
                        })
                    }
                },
            },
        };
        row.push(value);
    }

    Ok(row)
}

/// Generate the complete output file content for the loaded records.
///
/// Emits the fixed 3-line header, seven separator lines, then one
/// comma-joined row per record in file order. Derivation and feature
/// naming run on a clone of each record, so the loaded set is never
/// mutated and repeated runs produce identical output.
pub fn generate_output(
    records: &[ParsedRecord],
    registry: &DeriveRegistry,
    header: &OutputHeader,
) -> Result<String, ConvertError> {
    let mut output = String::new();

    writeln!(output, "MAP: {}", header.map).unwrap();
    writeln!(output, "MODEL: {}", header.model).unwrap();
    writeln!(
        output,
        "USER: {}   NAME: {}   DATE: {}",
        header.user, header.name, header.timestamp
    )
    .unwrap();
    for _ in 0..7 {
        writeln!(output, "-").unwrap();
    }

    let mut counter = NameCounter::new();
    for parsed in records {
        let derive = registry
            .get(&parsed.tag)
            .ok_or_else(|| ConvertError::UnregisteredType {
                tag: parsed.tag.clone(),
            })?;

        let mut record = parsed.record.clone();
        derive(&mut record)?;

        let id = counter.next(record.feature_prefix());
        let feature_name = format!("{}_{}", record.feature_prefix(), id);
        record.set_feature_name(feature_name);

        let row = format_record(&record)?;
        writeln!(output, "{}", row.join(",")).unwrap();
    }

    Ok(output)
}
