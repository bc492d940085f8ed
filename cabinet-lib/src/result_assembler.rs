use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cell::CellValue;
use crate::row_normalizer::Row;
use crate::sheet_validator::SheetError;

/// A sheet that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Cabinet {
    pub name: String,
    pub rows: Vec<Row>,
    pub corridor: Option<CellValue>,
}

impl Cabinet {
    /// Cabinets with a blank, zero or missing corridor count as ungrouped
    pub fn has_corridor(&self) -> bool {
        self.corridor.as_ref().is_some_and(CellValue::is_truthy)
    }
}

/// A sheet that failed validation with everything found wrong with it
#[derive(Debug, Clone, PartialEq)]
pub struct SheetErrors {
    pub sheet: String,
    pub errors: Vec<SheetError>,
}

impl SheetErrors {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Outcome of one non-empty sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CabinetResult {
    Invalid(SheetErrors),
    Valid(Cabinet),
}

/// Every sheet outcome of one workbook, in tab order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingReport {
    pub cabinets: Vec<Cabinet>,
    pub errors: Vec<SheetErrors>,
}

/// Partition per-sheet outcomes into accepted cabinets and rejected sheets
pub fn assemble(results: Vec<CabinetResult>) -> ProcessingReport {
    let mut report = ProcessingReport::default();

    for result in results {
        match result {
            CabinetResult::Valid(cabinet) => report.cabinets.push(cabinet),
            CabinetResult::Invalid(errors) => report.errors.push(errors),
        }
    }

    report
}

/// Stable reorder: cabinets without a corridor first, then those with one
pub fn corridor_order(cabinets: Vec<Cabinet>) -> Vec<Cabinet> {
    let (mut ordered, grouped): (Vec<_>, Vec<_>) =
        cabinets.into_iter().partition(|cabinet| !cabinet.has_corridor());
    ordered.extend(grouped);
    ordered
}

/// The all-or-nothing response: errors only when no cabinet was accepted,
/// otherwise the accepted cabinets' rows
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Rejected(Vec<SheetErrors>),
    Cabinets(Vec<Cabinet>),
}

impl Response {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Response::Rejected(_))
    }
}

/// The response that always carries both accepted cabinets and sheet errors
#[derive(Debug, Clone, PartialEq)]
pub struct FullResponse {
    pub cabinets: Vec<Cabinet>,
    pub errors: Vec<SheetErrors>,
}

impl FullResponse {
    /// Nothing usable came out of the workbook, but something was wrong with it
    pub fn is_rejected(&self) -> bool {
        self.cabinets.is_empty() && !self.errors.is_empty()
    }
}

impl ProcessingReport {
    pub fn into_response(self) -> Response {
        if self.cabinets.is_empty() && !self.errors.is_empty() {
            return Response::Rejected(self.errors);
        }

        if !self.errors.is_empty() {
            let dropped: Vec<&str> = self.errors.iter().map(|e| e.sheet.as_str()).collect();
            tracing::warn!(
                "Dropping {} rejected sheet(s) from the response: {:?}",
                dropped.len(),
                dropped
            );
        }

        Response::Cabinets(corridor_order(self.cabinets))
    }

    pub fn into_full_response(self) -> FullResponse {
        FullResponse {
            cabinets: corridor_order(self.cabinets),
            errors: self.errors,
        }
    }
}

//////////////////////////////////////////////////////////////
///  JSON shapes
//////////////////////////////////////////////////////////////

struct ErrorsMap<'a>(&'a [SheetErrors]);

impl Serialize for ErrorsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for sheet in self.0 {
            map.serialize_entry(&sheet.sheet, &sheet.messages())?;
        }
        map.end()
    }
}

struct CabinetEntry<'a>(&'a Cabinet);

impl Serialize for CabinetEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("data", &self.0.rows)?;
        map.serialize_entry("corridor", &self.0.corridor)?;
        map.end()
    }
}

struct CabinetsMap<'a>(&'a [Cabinet]);

impl Serialize for CabinetsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for cabinet in self.0 {
            map.serialize_entry(&cabinet.name, &CabinetEntry(cabinet))?;
        }
        map.end()
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Response::Rejected(errors) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("errors", &ErrorsMap(errors))?;
                map.end()
            }
            Response::Cabinets(cabinets) => {
                let mut map = serializer.serialize_map(Some(cabinets.len()))?;
                for cabinet in cabinets {
                    map.serialize_entry(&cabinet.name, &cabinet.rows)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for FullResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("data", &CabinetsMap(&self.cabinets))?;
        map.serialize_entry("errors", &ErrorsMap(&self.errors))?;
        map.end()
    }
}
