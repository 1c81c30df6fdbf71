//! Fixed-format interchange file export.
//!
//! Layout of every file:
//!
//! - no header line, no index column
//! - `;` between fields, quoting only where a field needs it
//! - amounts with exactly two decimals and a decimal comma (`-50,00`)
//! - dates as `dd/mm/yyyy`
//! - CRLF after every row, the last one included
//! - Windows-1252 bytes
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use compta_export::balance::build_balance;
//! use compta_export::core::ExportConfig;
//! use compta_export::export::to_bytes;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
//! let table = build_balance(&[], &ExportConfig::default(), date).unwrap();
//! let bytes = to_bytes(&table).unwrap();
//! assert!(bytes.ends_with(b"FIN;;0\r\n"));
//! ```

mod naming;

pub use naming::{FileKind, file_name};

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use encoding_rs::WINDOWS_1252;
use rust_decimal::Decimal;

use crate::core::{BalanceRow, ExportConfig, ExportError, Table, TiersRow};
use crate::split::Scope;

/// Field delimiter.
pub const DELIMITER: u8 = b';';

/// Date rendering of balance rows.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One cell of an interchange row.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    Amount(Decimal),
    Date(Option<NaiveDate>),
}

impl Field<'_> {
    fn render(&self) -> String {
        match self {
            Self::Text(s) => (*s).to_string(),
            Self::Amount(d) => format_amount(*d),
            Self::Date(Some(d)) => d.format(DATE_FORMAT).to_string(),
            Self::Date(None) => String::new(),
        }
    }
}

/// A row that can be written to an interchange file.
pub trait InterchangeRecord {
    /// Cells in file order.
    fn fields(&self) -> Vec<Field<'_>>;
}

impl InterchangeRecord for BalanceRow {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.vendor_code),
            Field::Date(Some(self.file_date)),
            Field::Text(&self.client_code),
            Field::Text(&self.document_number),
            Field::Date(self.document_date),
            Field::Text(&self.currency),
            Field::Amount(self.amount),
            Field::Date(self.due_date),
            Field::Text(self.document_type.code()),
            Field::Text(self.payment.code()),
            Field::Text(&self.order_number),
        ]
    }
}

impl InterchangeRecord for TiersRow {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.vendor_code),
            Field::Text(&self.client_code),
            Field::Text(&self.tax_id),
            Field::Text(&self.short_name),
            Field::Text(&self.legal_name),
            Field::Text(&self.street),
            Field::Text(&self.complement),
            Field::Text(&self.postal_code),
            Field::Text(&self.city),
            Field::Text(&self.country_code),
        ]
    }
}

/// Serialize a table to interchange bytes.
pub fn to_bytes<R: InterchangeRecord>(table: &Table<R>) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    for row in table.rows() {
        writer.write_record(row.fields().iter().map(Field::render))?;
    }

    let utf8 = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    let text = String::from_utf8(utf8).map_err(|e| ExportError::Encoding(e.to_string()))?;
    encode_windows_1252(&text)
}

fn encode_windows_1252(text: &str) -> Result<Vec<u8>, ExportError> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        let bad = text
            .chars()
            .find(|c| {
                let mut buf = [0u8; 4];
                WINDOWS_1252.encode(c.encode_utf8(&mut buf)).2
            })
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(ExportError::Encoding(format!(
            "character '{bad}' (U+{:04X}) cannot be written as windows-1252",
            bad as u32
        )));
    }
    Ok(bytes.into_owned())
}

/// Decode interchange bytes back into rows of field text.
pub fn read_interchange(bytes: &[u8]) -> Result<Vec<Vec<String>>, ExportError> {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

/// Format an amount with a decimal comma and exactly 2 decimals.
pub fn format_amount(d: Decimal) -> String {
    let scaled = d.round_dp(2);
    let s = format!("{:.2}", scaled);
    s.replace('.', ",")
}

/// Parse an amount written by [`format_amount`].
pub fn parse_amount(s: &str) -> Option<Decimal> {
    s.trim().replace(',', ".").parse().ok()
}

/// Outcome of writing one interchange file.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub kind: FileKind,
    pub scope: Option<Scope>,
    /// Written path, or the reason nothing usable was written.
    pub result: Result<PathBuf, String>,
}

impl ExportOutcome {
    pub fn success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn path(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(PathBuf::as_path)
    }

    /// One-line human-readable summary.
    pub fn message(&self) -> String {
        let what = match self.scope {
            Some(scope) => format!("{} file ({scope})", self.kind.label()),
            None => format!("{} file", self.kind.label()),
        };
        match &self.result {
            Ok(path) => format!("{what} written to {}", path.display()),
            Err(e) => format!("{what} failed: {e}"),
        }
    }
}

/// Serialize `table` and write it into `dest` (current directory when
/// `None`) under its deterministic name.
///
/// Failures are returned inside the outcome, never raised.
pub fn export_table<R: InterchangeRecord>(
    table: &Table<R>,
    kind: FileKind,
    scope: Option<Scope>,
    dest: Option<&Path>,
    config: &ExportConfig,
    run_date: NaiveDate,
) -> ExportOutcome {
    let dir = dest.unwrap_or_else(|| Path::new("."));
    let path = dir.join(file_name(kind, scope, &config.file_naming, run_date));

    let result = to_bytes(table)
        .and_then(|bytes| std::fs::write(&path, bytes).map_err(ExportError::from))
        .map(|()| path.clone())
        .map_err(|e| e.to_string());

    match &result {
        Ok(p) => tracing::info!(path = %p.display(), rows = table.len(), "interchange file written"),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "interchange file not written"),
    }

    ExportOutcome {
        kind,
        scope,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_basic() {
        assert_eq!(format_amount(Decimal::new(119000, 2)), "1190,00");
        assert_eq!(format_amount(Decimal::new(2495, 2)), "24,95");
        assert_eq!(format_amount(Decimal::new(100, 0)), "100,00");
        assert_eq!(format_amount(dec!(-50)), "-50,00");
        assert_eq!(format_amount(Decimal::ZERO), "0,00");
    }

    #[test]
    fn format_amount_rounds() {
        assert_eq!(format_amount(Decimal::new(123456, 3)), "123,46");
    }

    #[test]
    fn parse_amount_inverse() {
        assert_eq!(parse_amount("-50,00"), Some(dec!(-50)));
        assert_eq!(parse_amount("1190,00"), Some(dec!(1190)));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn encodes_accents_as_single_bytes() {
        assert_eq!(encode_windows_1252("é€").unwrap(), vec![0xE9, 0x80]);
    }

    #[test]
    fn rejects_unencodable_characters() {
        let err = encode_windows_1252("Łódź").unwrap_err();
        assert!(matches!(err, ExportError::Encoding(_)));
        assert!(err.to_string().contains("U+0141"));
    }

    #[test]
    fn field_rendering() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Field::Date(Some(d)).render(), "09/03/2024");
        assert_eq!(Field::Date(None).render(), "");
        assert_eq!(Field::Amount(dec!(3.5)).render(), "3,50");
        assert_eq!(Field::Text("x").render(), "x");
    }

    #[test]
    fn outcome_message() {
        let ok = ExportOutcome {
            kind: FileKind::Balance,
            scope: Some(Scope::Foreign),
            result: Ok(PathBuf::from("/tmp/BAL.csv")),
        };
        assert_eq!(ok.message(), "balance file (foreign) written to /tmp/BAL.csv");
        let err = ExportOutcome {
            kind: FileKind::Tiers,
            scope: None,
            result: Err("disk full".into()),
        };
        assert!(!err.success());
        assert_eq!(err.message(), "tiers file failed: disk full");
    }
}
