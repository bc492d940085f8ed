#![allow(clippy::needless_return)]

mod cell;
mod processor;
mod result_assembler;
mod row_normalizer;
mod sheet;
mod sheet_validator;
mod workbook_loader;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use cell::CellValue;
pub use processor::{ProcessError, process_file, process_file_report, process_sheet, process_sheets};
pub use result_assembler::{
    Cabinet, CabinetResult, FullResponse, ProcessingReport, Response, SheetErrors, assemble,
    corridor_order,
};
pub use row_normalizer::{CORRIDOR_COLUMN, Row, extract_first_nonmissing, normalize};
pub use sheet::{Sheet, SheetRow};
pub use sheet_validator::{
    BLADE_TOKEN, REQUIRED_COLUMNS, SheetError, contains_digit, is_valid_unit, missing_columns,
    validate,
};
pub use workbook_loader::{LoadError, Workbook, sheet_from_range};

pub const ERRORS_LOG_FILE: &str = "errors.log";
