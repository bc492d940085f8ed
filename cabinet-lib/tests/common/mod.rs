use cabinet_lib::CellValue;
use std::path::{Path, PathBuf};

// Re-export shared test utilities from src/test_utils.rs
pub use cabinet_lib::test_utils::{header, num, rack_row, required_header, text};

/// Sheet contents for a generated workbook: tab name and grid (first row is the header)
pub type SheetSpec<'a> = (&'a str, Vec<Vec<CellValue>>);

/// Write a real .xlsx file with one worksheet per entry, in order
#[allow(dead_code)]
pub fn write_workbook(dir: &Path, file_name: &str, sheets: &[SheetSpec]) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = cabinet_lib::test_utils::build_workbook(sheets).unwrap();
    workbook.save(&path).unwrap();
    path
}
