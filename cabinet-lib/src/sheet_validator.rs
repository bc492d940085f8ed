use thiserror::Error;

use crate::cell::CellValue;
use crate::sheet::Sheet;

/// Columns every cabinet sheet has to carry, in reporting order
pub const REQUIRED_COLUMNS: [&str; 6] = ["No", "Owner", "BrandModel", "Serial", "Rack", "U"];

pub const RACK_COLUMN: &str = "Rack";
pub const UNIT_COLUMN: &str = "U";

/// The literal accepted in the `U` column instead of a number (any case)
pub const BLADE_TOKEN: &str = "BLADE";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Missing columns: [{}]", quoted_list(.columns))]
    MissingColumns { columns: Vec<String> },

    #[error("Row {row}: Rack must contain a numeric value")]
    RackNotNumeric { row: usize },

    #[error("Row {row}: U must be numeric or 'BLADE'")]
    InvalidUnit { row: usize },
}

fn quoted_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a cabinet sheet against the fixed column schema and the Rack/U rules
///
/// An empty result means the sheet is valid. Ordering: the missing-columns
/// error first, then row errors in row order with the Rack error ahead of the
/// U error for the same row. A rule is skipped when its column is absent,
/// since the missing-columns error already reports it.
pub fn validate(sheet: &Sheet) -> Vec<SheetError> {
    let mut errors = Vec::new();

    let missing = missing_columns(sheet);
    if !missing.is_empty() {
        errors.push(SheetError::MissingColumns { columns: missing });
    }

    let rack_idx = sheet.column_index(RACK_COLUMN);
    let unit_idx = sheet.column_index(UNIT_COLUMN);

    for row in &sheet.rows {
        if let Some(idx) = rack_idx {
            let rack = &row.cells[idx];
            if !rack.is_missing() && !contains_digit(rack) {
                errors.push(SheetError::RackNotNumeric {
                    row: row.row_number,
                });
            }
        }

        if let Some(idx) = unit_idx {
            if !is_valid_unit(&row.cells[idx]) {
                errors.push(SheetError::InvalidUnit {
                    row: row.row_number,
                });
            }
        }
    }

    errors
}

/// Required columns absent from the sheet header, in schema order
pub fn missing_columns(sheet: &Sheet) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|column| !sheet.has_column(column))
        .map(|column| column.to_string())
        .collect()
}

/// Rack values like `R12`, `12` or `A-3` qualify; `Left` does not
///
/// Any Unicode digit counts, so `R٣` qualifies too.
pub fn contains_digit(value: &CellValue) -> bool {
    match value {
        CellValue::Number(_) => true,
        other => other.to_string().chars().any(char::is_numeric),
    }
}

/// A rack-unit value is a float (possibly written as text) or `BLADE`
///
/// Booleans convert to 1.0 / 0.0 and are accepted as numbers.
pub fn is_valid_unit(value: &CellValue) -> bool {
    match value {
        CellValue::Number(_) | CellValue::Bool(_) => true,
        CellValue::Text(s) => {
            s.trim().parse::<f64>().is_ok() || s.eq_ignore_ascii_case(BLADE_TOKEN)
        }
        CellValue::Empty => false,
    }
}
