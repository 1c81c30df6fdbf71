//! Spreadsheet sources (selected sheet, first row as header).

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;

use super::{Cell, ColumnMap};
use crate::core::{ConversionError, RawRecord, SheetSelector, SourceLayout};

pub(super) fn read_workbook(
    path: &Path,
    layout: &SourceLayout,
) -> Result<Vec<RawRecord>, ConversionError> {
    let read_err = |e: calamine::Error| ConversionError::Read(format!("{}: {e}", path.display()));

    let mut workbook = open_workbook_auto(path).map_err(read_err)?;
    let index = sheet_index(&workbook.sheet_names(), &layout.sheet)
        .map_err(|message| ConversionError::Read(format!("{}: {message}", path.display())))?;
    let range = workbook
        .worksheet_range_at(index)
        .ok_or_else(|| {
            ConversionError::Read(format!("{}: {} not found", path.display(), layout.sheet))
        })?
        .map_err(read_err)?;
    tracing::debug!(sheet = %layout.sheet, index, "worksheet selected");

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ConversionError::Read(format!("{}: {} is empty", path.display(), layout.sheet)))?;
    let headers: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    let columns = ColumnMap::resolve(&headers, layout)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let cells: Vec<Cell> = row.iter().map(to_cell).collect();
        if let Some(record) = columns.record(i + 1, &cells, layout)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Position of the selected sheet among `names`.
fn sheet_index(names: &[String], sheet: &SheetSelector) -> Result<usize, String> {
    match sheet {
        SheetSelector::Index(i) if *i < names.len() => Ok(*i),
        SheetSelector::Name(name) => names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| format!("{sheet} not found (sheets: {})", names.join(", "))),
        SheetSelector::Index(_) => Err(format!(
            "{sheet} not found (workbook has {} sheet(s))",
            names.len()
        )),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Cell::Date(d.date()))
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::text(s)),
        other => Cell::text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_cells() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::Int(1042)), Cell::Number(1042.0));
        assert_eq!(to_cell(&Data::String(" VIR ".into())), Cell::Text("VIR".into()));
        assert_eq!(to_cell(&Data::String("  ".into())), Cell::Empty);
    }

    #[test]
    fn iso_dates() {
        assert_eq!(
            to_cell(&Data::DateTimeIso("2024-03-15T00:00:00".into())),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    fn names() -> Vec<String> {
        vec!["Factures".into(), "Avoirs".into()]
    }

    #[test]
    fn selects_sheet_by_index_or_name() {
        assert_eq!(sheet_index(&names(), &SheetSelector::default()), Ok(0));
        assert_eq!(sheet_index(&names(), &SheetSelector::Index(1)), Ok(1));
        assert_eq!(sheet_index(&names(), &SheetSelector::Name("Avoirs".into())), Ok(1));
    }

    #[test]
    fn missing_sheet_is_reported() {
        let err = sheet_index(&names(), &SheetSelector::Index(2)).unwrap_err();
        assert_eq!(err, "sheet #2 not found (workbook has 2 sheet(s))");

        let err = sheet_index(&names(), &SheetSelector::Name("avoirs".into())).unwrap_err();
        assert_eq!(err, "sheet 'avoirs' not found (sheets: Factures, Avoirs)");

        assert!(sheet_index(&[], &SheetSelector::default()).is_err());
    }

    #[test]
    fn missing_workbook_is_a_read_error() {
        let err = read_workbook(Path::new("/no/such/export.xlsx"), &SourceLayout::default())
            .unwrap_err();
        assert!(matches!(err, ConversionError::Read(_)));
    }
}
