//! Output generation for the CALIGO fixed-column format.

mod caligo;

pub use caligo::{format_number, format_record, generate_output, NameCounter, OutputHeader};
