use crate::cell::CellValue;
use crate::utils::unique_header_names;

/// A data row together with the row number it has in the spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based spreadsheet row number (the header usually sits on row 1)
    pub row_number: usize,
    /// One cell per column, aligned with [`Sheet::columns`]
    pub cells: Vec<CellValue>,
}

/// One worksheet (one cabinet): header columns plus non-empty data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Build a sheet from raw grid rows where the first row is the header
    ///
    /// `first_row_number` is the 1-based spreadsheet row of that header row.
    /// Rows whose cells are all missing are dropped; the remaining rows keep
    /// their spreadsheet row numbers. Short rows are padded with empty cells.
    pub fn from_grid(name: &str, first_row_number: usize, grid: Vec<Vec<CellValue>>) -> Sheet {
        let mut grid = grid.into_iter();

        let raw_headers: Vec<String> = grid
            .next()
            .map(|header| header.iter().map(|cell| cell.to_string()).collect())
            .unwrap_or_default();
        let columns = unique_header_names(&raw_headers);

        let rows = grid
            .enumerate()
            .filter(|(_, cells)| !cells.iter().all(CellValue::is_missing))
            .map(|(offset, mut cells)| {
                cells.resize(columns.len(), CellValue::Empty);
                SheetRow {
                    row_number: first_row_number + offset + 1,
                    cells,
                }
            })
            .collect();

        Sheet {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    /// A sheet with no data rows is not part of the dataset
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// All values of a column in row order, or `None` when the column is absent
    pub fn column_values(
        &self,
        column: &str,
    ) -> Option<impl Iterator<Item = (&SheetRow, &CellValue)>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| (row, &row.cells[idx])))
    }
}
