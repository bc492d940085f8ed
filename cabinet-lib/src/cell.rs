use calamine::Data;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::utils::excel_serial_to_iso;

/// Largest integer magnitude an f64 holds exactly; integral numbers inside it
/// are emitted as JSON integers
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single spreadsheet cell after it has been read from the workbook
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Whether the value counts as "set" when used as a grouping label
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Number(n) => *n != 0.0,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Bool(b) => *b,
            CellValue::Empty => false,
        }
    }

    /// Replace a missing value with an empty string, leaving everything else as is
    pub fn fill_empty(self) -> CellValue {
        match self {
            CellValue::Empty => CellValue::Text(String::new()),
            other => other,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) if f.is_finite() => CellValue::Number(*f),
            Data::Float(_) => CellValue::Empty,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Text(excel_serial_to_iso(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}
