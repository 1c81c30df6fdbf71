//! Source record loading.
//!
//! A thin adapter between the accounting export and the pipeline: it finds
//! the six needed columns by header name and turns each non-blank row into a
//! [`RawRecord`]. CSV sources are always supported. Spreadsheets
//! (`.xlsx`, `.xls`, `.xlsm`) need the `xlsx` feature.

mod cell;
mod delimited;
#[cfg(feature = "xlsx")]
mod workbook;

pub use cell::Cell;

use std::path::Path;

use crate::core::{ConversionError, RawRecord, SourceLayout};

/// Load every record of the source file at `path`, in file order.
pub fn load_records(path: &Path, layout: &SourceLayout) -> Result<Vec<RawRecord>, ConversionError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => {
            let bytes = std::fs::read(path)
                .map_err(|e| ConversionError::Read(format!("{}: {e}", path.display())))?;
            delimited::read_csv(&bytes, layout)?
        }
        "xlsx" | "xls" | "xlsm" => read_workbook(path, layout)?,
        other => {
            return Err(ConversionError::Validation(format!(
                "unsupported format: '.{other}'"
            )));
        }
    };

    tracing::debug!(records = records.len(), path = %path.display(), "source loaded");
    Ok(records)
}

#[cfg(feature = "xlsx")]
fn read_workbook(path: &Path, layout: &SourceLayout) -> Result<Vec<RawRecord>, ConversionError> {
    workbook::read_workbook(path, layout)
}

#[cfg(not(feature = "xlsx"))]
fn read_workbook(path: &Path, _layout: &SourceLayout) -> Result<Vec<RawRecord>, ConversionError> {
    Err(ConversionError::Read(format!(
        "{}: spreadsheet support is not enabled (build with the `xlsx` feature)",
        path.display()
    )))
}

/// Positions of the needed columns in a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    client_code: usize,
    payment_mode: usize,
    document_number: usize,
    document_date: usize,
    due_date: usize,
    amount: usize,
}

impl ColumnMap {
    fn resolve<S: AsRef<str>>(headers: &[S], layout: &SourceLayout) -> Result<Self, ConversionError> {
        let find = |configured: &str| {
            let wanted = normalize_header(configured);
            headers
                .iter()
                .position(|h| normalize_header(h.as_ref()) == wanted)
                .ok_or_else(|| {
                    ConversionError::Read(format!("missing required column '{configured}'"))
                })
        };
        Ok(Self {
            client_code: find(&layout.client_code)?,
            payment_mode: find(&layout.payment_mode)?,
            document_number: find(&layout.document_number)?,
            document_date: find(&layout.document_date)?,
            due_date: find(&layout.due_date)?,
            amount: find(&layout.amount)?,
        })
    }

    /// Build a record from one row, `None` when the row is blank.
    fn record(
        &self,
        row: usize,
        cells: &[Cell],
        layout: &SourceLayout,
    ) -> Result<Option<RawRecord>, ConversionError> {
        if cells.iter().all(Cell::is_empty) {
            return Ok(None);
        }
        let at = |idx: usize| cells.get(idx).unwrap_or(&Cell::Empty);
        let formats = &layout.date_formats;

        let document_date = at(self.document_date)
            .to_date(formats)
            .map_err(|message| ConversionError::Parse { row, message })?
            .ok_or_else(|| ConversionError::Parse {
                row,
                message: format!("'{}' is empty", layout.document_date),
            })?;

        Ok(Some(RawRecord {
            client_code: at(self.client_code).to_code(),
            payment_mode: at(self.payment_mode).to_code(),
            document_number: at(self.document_number).to_code(),
            document_date,
            due_date: at(self.due_date)
                .to_date(formats)
                .map_err(|message| ConversionError::Parse { row, message })?,
            gross_amount: at(self.amount)
                .to_amount()
                .map_err(|message| ConversionError::Parse { row, message })?,
        }))
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase()
}
