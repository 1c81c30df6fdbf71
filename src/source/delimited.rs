//! CSV sources.

use csv::{ReaderBuilder, Trim};

use super::{Cell, ColumnMap};
use crate::core::{ConversionError, RawRecord, SourceLayout};
use crate::reference::{decode_text, detect_delimiter};

pub(super) fn read_csv(bytes: &[u8], layout: &SourceLayout) -> Result<Vec<RawRecord>, ConversionError> {
    let text = decode_text(bytes);
    let delimiter = match layout.delimiter {
        Some(c) => u8::try_from(c).ok().filter(u8::is_ascii).ok_or_else(|| {
            ConversionError::Config(format!("source delimiter '{c}' must be an ASCII character"))
        })?,
        None => detect_delimiter(&text),
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let columns = ColumnMap::resolve(&headers, layout)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let cells: Vec<Cell> = row.iter().map(Cell::text).collect();
        if let Some(record) = columns.record(i + 1, &cells, layout)? {
            records.push(record);
        }
    }
    Ok(records)
}
