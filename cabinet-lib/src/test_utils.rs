// Test utilities available to both unit and integration tests
// Only compiled when testing

use crate::cell::CellValue;
use crate::sheet::Sheet;
use crate::sheet_validator::REQUIRED_COLUMNS;
#[cfg(feature = "test")]
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

/// Build an in-memory sheet whose header is `columns` (header on row 1)
pub fn sheet_with_columns(name: &str, columns: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
    let mut grid = vec![columns.iter().map(|c| text(c)).collect::<Vec<_>>()];
    grid.extend(rows);
    Sheet::from_grid(name, 1, grid)
}

/// Build a sheet with exactly the required cabinet columns
pub fn cabinet_sheet(name: &str, rows: Vec<Vec<CellValue>>) -> Sheet {
    sheet_with_columns(name, &REQUIRED_COLUMNS, rows)
}

/// Build a sheet with the required columns plus a trailing `Corridor` column
///
/// Every row gets `corridor` in that column (`None` leaves it empty).
pub fn corridor_sheet(name: &str, corridor: Option<&str>, rows: Vec<Vec<CellValue>>) -> Sheet {
    let mut columns = REQUIRED_COLUMNS.to_vec();
    columns.push("Corridor");

    let rows = rows
        .into_iter()
        .map(|mut row| {
            row.push(corridor.map(text).unwrap_or(CellValue::Empty));
            row
        })
        .collect();

    sheet_with_columns(name, &columns, rows)
}

/// A data row in required-column order: No, Owner, BrandModel, Serial, Rack, U
pub fn rack_row(no: u32, rack: &str, unit: &str) -> Vec<CellValue> {
    vec![
        num(no as f64),
        text("Infra"),
        text("Dell R640"),
        text(&format!("SN-{no:04}")),
        text(rack),
        text(unit),
    ]
}

/// Header row with the required columns in their usual order
pub fn required_header() -> Vec<CellValue> {
    header(&REQUIRED_COLUMNS)
}

/// Header row from arbitrary column names
pub fn header(columns: &[&str]) -> Vec<CellValue> {
    columns.iter().map(|c| text(c)).collect()
}

/// Write `grid` into `worksheet` starting at A1
///
/// Empty cells are left unwritten so they read back as missing.
#[cfg(feature = "test")]
pub fn write_grid(worksheet: &mut Worksheet, grid: &[Vec<CellValue>]) -> Result<(), XlsxError> {
    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                CellValue::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                CellValue::Empty => {}
            }
        }
    }
    Ok(())
}

/// Build a workbook with one worksheet per (name, grid) entry, in order
#[cfg(feature = "test")]
pub fn build_workbook(sheets: &[(&str, Vec<Vec<CellValue>>)]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    for (name, grid) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_grid(worksheet, grid)?;
    }
    Ok(workbook)
}
