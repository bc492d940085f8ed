use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::cell::CellValue;
use crate::sheet::Sheet;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open workbook '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Error reading sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

/// An opened spreadsheet document (xlsx, xlsm, xlsb, xls or ods)
pub struct Workbook {
    inner: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open a workbook, picking the reader from the file extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Workbook, LoadError> {
        let path = path.as_ref();
        let inner = open_workbook_auto(path).map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Workbook { inner })
    }

    /// Sheet (tab) names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    /// Read one sheet's header and data rows
    pub fn sheet(&mut self, name: &str) -> Result<Sheet, LoadError> {
        let range = self
            .inner
            .worksheet_range(name)
            .map_err(|source| LoadError::Sheet {
                sheet: name.to_string(),
                source,
            })?;

        Ok(sheet_from_range(name, &range))
    }

    /// Read every sheet in tab order
    pub fn sheets(&mut self) -> Result<Vec<Sheet>, LoadError> {
        self.sheet_names()
            .iter()
            .map(|name| self.sheet(name))
            .collect()
    }
}

/// Convert a calamine cell range into a [`Sheet`]
///
/// The used range may start below row 1; the header's spreadsheet row is
/// derived from the range origin so reported row numbers match the file.
pub fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let first_row_number = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let grid = range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    Sheet::from_grid(name, first_row_number, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_origin_sets_row_numbers() {
        let mut range: Range<Data> = Range::new((2, 0), (3, 1));
        range.set_value((2, 0), Data::String("No".to_string()));
        range.set_value((2, 1), Data::String("U".to_string()));
        range.set_value((3, 0), Data::Int(1));
        range.set_value((3, 1), Data::String("BLADE".to_string()));

        let sheet = sheet_from_range("Cab1", &range);

        assert_eq!(sheet.columns, vec!["No".to_string(), "U".to_string()]);
        assert_eq!(sheet.rows.len(), 1);
        // Header on spreadsheet row 3, first data row on row 4
        assert_eq!(sheet.rows[0].row_number, 4);
        assert_eq!(sheet.rows[0].cells[0], CellValue::Number(1.0));
    }

    #[test]
    fn test_empty_range_gives_empty_sheet() {
        let range: Range<Data> = Range::empty();
        let sheet = sheet_from_range("Empty", &range);
        assert!(sheet.is_empty());
        assert!(sheet.columns.is_empty());
    }

    #[test]
    fn test_open_missing_file_is_load_error() {
        let result = Workbook::open("/definitely/not/here/rack.xlsx");
        match result {
            Err(LoadError::Open { path, .. }) => assert!(path.ends_with("rack.xlsx")),
            Err(other) => panic!("Expected open error, got {other}"),
            Ok(_) => panic!("Opening a missing file should fail"),
        }
    }
}
