use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::result_assembler::{Cabinet, CabinetResult, ProcessingReport, SheetErrors, assemble};
use crate::row_normalizer::normalize;
use crate::sheet::Sheet;
use crate::sheet_validator::validate;
use crate::workbook_loader::{LoadError, Workbook};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Cannot encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Validate and normalize every cabinet sheet of the workbook at `path`
///
/// Returns the all-or-nothing JSON shape: `{"errors": {...}}` when no sheet
/// was accepted, otherwise `{sheet: [rows...]}` for the accepted sheets with
/// corridor-less cabinets first. Only a workbook that cannot be read is an
/// `Err`; sheet problems are part of the returned value.
///
/// Calling it twice on an unchanged file gives identical output.
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<Value, ProcessError> {
    let response = process_file_report(path)?.into_response();
    Ok(serde_json::to_value(&response)?)
}

/// Like [`process_file`] but returns the typed per-sheet outcomes
pub fn process_file_report<P: AsRef<Path>>(path: P) -> Result<ProcessingReport, LoadError> {
    let path = path.as_ref();
    let mut workbook = Workbook::open(path)?;
    let sheets = workbook.sheets()?;

    tracing::debug!("Read {} sheet(s) from {}", sheets.len(), path.display());

    Ok(process_sheets(sheets))
}

/// Run validation and normalization over already loaded sheets
pub fn process_sheets(sheets: Vec<Sheet>) -> ProcessingReport {
    let results = sheets
        .iter()
        .filter_map(|sheet| {
            if sheet.is_empty() {
                tracing::debug!("Skipping sheet '{}': no data rows", sheet.name);
                return None;
            }
            Some(process_sheet(sheet))
        })
        .collect();

    assemble(results)
}

/// Validate one non-empty sheet and normalize it when it passes
pub fn process_sheet(sheet: &Sheet) -> CabinetResult {
    let errors = validate(sheet);

    if !errors.is_empty() {
        tracing::warn!(
            "Sheet '{}' rejected with {} error(s)",
            sheet.name,
            errors.len()
        );
        return CabinetResult::Invalid(SheetErrors {
            sheet: sheet.name.clone(),
            errors,
        });
    }

    let (rows, corridor) = normalize(sheet);
    tracing::debug!(
        "Sheet '{}' accepted: {} row(s), corridor {:?}",
        sheet.name,
        rows.len(),
        corridor
    );

    CabinetResult::Valid(Cabinet {
        name: sheet.name.clone(),
        rows,
        corridor,
    })
}
