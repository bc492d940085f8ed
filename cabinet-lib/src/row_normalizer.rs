use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cell::CellValue;
use crate::sheet::{Sheet, SheetRow};

pub const CORRIDOR_COLUMN: &str = "Corridor";

/// One output row: column name to value, in header order, with no missing cells
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub fields: Vec<(String, CellValue)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Turn a sheet's data rows into output rows and pull out its corridor label
///
/// The corridor is read before empty cells are filled, so an empty corridor
/// cell stays distinct from an empty string at that one point.
pub fn normalize(sheet: &Sheet) -> (Vec<Row>, Option<CellValue>) {
    let corridor = extract_first_nonmissing(sheet, CORRIDOR_COLUMN);

    let rows = sheet
        .rows
        .iter()
        .map(|row| normalize_row(&sheet.columns, row))
        .collect();

    (rows, corridor)
}

/// The value of `column` in the first data row, if the column exists and that
/// value is not missing. Later rows are never consulted.
pub fn extract_first_nonmissing(sheet: &Sheet, column: &str) -> Option<CellValue> {
    sheet
        .column_values(column)?
        .next()
        .map(|(_, value)| value)
        .filter(|value| !value.is_missing())
        .cloned()
}

fn normalize_row(columns: &[String], row: &SheetRow) -> Row {
    let fields = columns
        .iter()
        .zip(&row.cells)
        .map(|(column, value)| (column.clone(), value.clone().fill_empty()))
        .collect();

    Row { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use serde_json::json;

    #[test]
    fn test_missing_cells_become_empty_strings() {
        let mut row = rack_row(1, "12", "2");
        row[3] = CellValue::Empty;
        let sheet = cabinet_sheet("Cab1", vec![row]);

        let (rows, _) = normalize(&sheet);

        assert_eq!(rows[0].get("Serial"), Some(&text("")));
        assert_eq!(
            serde_json::to_value(&rows[0]).unwrap(),
            json!({
                "No": 1,
                "Owner": "Infra",
                "BrandModel": "Dell R640",
                "Serial": "",
                "Rack": "12",
                "U": "2"
            })
        );
    }

    #[test]
    fn test_column_order_follows_header() {
        let sheet = sheet_with_columns(
            "Cab1",
            &["U", "No", "Extra"],
            vec![vec![text("BLADE"), num(3.0), CellValue::Empty]],
        );

        let (rows, _) = normalize(&sheet);
        let keys: Vec<&str> = rows[0].fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["U", "No", "Extra"]);

        let serialized = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(serialized, r#"{"U":"BLADE","No":3,"Extra":""}"#);
    }

    #[test]
    fn test_row_order_preserved() {
        let sheet = cabinet_sheet(
            "Cab1",
            vec![rack_row(3, "1", "1"), rack_row(1, "1", "1"), rack_row(2, "1", "1")],
        );

        let (rows, _) = normalize(&sheet);
        let numbers: Vec<&CellValue> = rows.iter().filter_map(|r| r.get("No")).collect();
        assert_eq!(numbers, vec![&num(3.0), &num(1.0), &num(2.0)]);
    }

    #[test]
    fn test_corridor_taken_from_first_row() {
        let sheet = corridor_sheet("Cab1", Some("Cold-A"), vec![rack_row(1, "1", "1")]);
        let (_, corridor) = normalize(&sheet);
        assert_eq!(corridor, Some(text("Cold-A")));
    }

    #[test]
    fn test_corridor_absent_without_column() {
        let sheet = cabinet_sheet("Cab1", vec![rack_row(1, "1", "1")]);
        assert_eq!(extract_first_nonmissing(&sheet, CORRIDOR_COLUMN), None);
    }

    #[test]
    fn test_corridor_only_looks_at_first_row() {
        let mut first = rack_row(1, "1", "1");
        first.push(CellValue::Empty);
        let mut second = rack_row(2, "1", "1");
        second.push(text("Hot-B"));

        let mut columns = crate::sheet_validator::REQUIRED_COLUMNS.to_vec();
        columns.push(CORRIDOR_COLUMN);
        let sheet = sheet_with_columns("Cab1", &columns, vec![first, second]);

        let (rows, corridor) = normalize(&sheet);
        assert_eq!(corridor, None, "A blank first row means no corridor");
        assert_eq!(rows[0].get(CORRIDOR_COLUMN), Some(&text("")));
        assert_eq!(rows[1].get(CORRIDOR_COLUMN), Some(&text("Hot-B")));
    }

    #[test]
    fn test_numeric_corridor_kept_as_number() {
        let mut row = rack_row(1, "1", "1");
        row.push(num(4.0));
        let mut columns = crate::sheet_validator::REQUIRED_COLUMNS.to_vec();
        columns.push(CORRIDOR_COLUMN);
        let sheet = sheet_with_columns("Cab1", &columns, vec![row]);

        assert_eq!(extract_first_nonmissing(&sheet, CORRIDOR_COLUMN), Some(num(4.0)));
    }
}
