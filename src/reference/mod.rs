//! Read-only reference tables: the client directory and the country table.
//!
//! Both are plain delimited files maintained by users, usually in a
//! spreadsheet program. The first line is a header and is skipped. The
//! delimiter (`;` or `,`) is taken from the header line, and files that are
//! not valid UTF-8 are decoded as Windows-1252.

mod clients;
mod countries;

pub use clients::{ClientDirectory, ClientEntry};
pub use countries::CountryTable;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::core::ConversionError;

/// Decode `bytes` and return each data record with its 1-based line number
/// (header excluded).
fn read_records(bytes: &[u8]) -> Result<Vec<(usize, StringRecord)>, ConversionError> {
    let text = decode_text(bytes);
    let delimiter = detect_delimiter(&text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ConversionError::Reference(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        out.push((i + 1, record));
    }
    Ok(out)
}

/// `;` when the header line has one, `,` otherwise.
pub(crate) fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') { b';' } else { b',' }
}

/// UTF-8 text (BOM stripped), or Windows-1252 when the bytes are not UTF-8.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => {
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Field `idx` of `record`, or `None` when absent or blank.
fn field(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
