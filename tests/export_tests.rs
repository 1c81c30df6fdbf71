use std::path::PathBuf;

use chrono::NaiveDate;
use compta_export::balance::build_balance;
use compta_export::core::*;
use compta_export::export::*;
use compta_export::split::Scope;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("compta-export-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_balance() -> BalanceTable {
    let records = vec![
        RawRecord {
            client_code: "C001".into(),
            payment_mode: "VIR".into(),
            document_number: "F-1".into(),
            document_date: date(2024, 1, 15),
            due_date: Some(date(2024, 2, 14)),
            gross_amount: dec!(100),
        },
        RawRecord {
            client_code: "C001".into(),
            payment_mode: "AVOIR".into(),
            document_number: "AV-1".into(),
            document_date: date(2024, 1, 16),
            due_date: None,
            gross_amount: dec!(50),
        },
    ];
    build_balance(&records, &ExportConfig::default(), date(2024, 2, 1)).unwrap()
}

fn tiers_row(city: &str) -> TiersRow {
    TiersRow {
        vendor_code: "V00001".into(),
        client_code: "C001".into(),
        tax_id: "12345678900011".into(),
        short_name: "Martin".into(),
        legal_name: "Martin; fils & Cie".into(),
        street: "1 quai".into(),
        complement: String::new(),
        postal_code: "34200".into(),
        city: city.into(),
        country_code: "FR".into(),
    }
}

// ---------------------------------------------------------------------------
// Byte layout
// ---------------------------------------------------------------------------

#[test]
fn balance_bytes_are_exact() {
    let bytes = to_bytes(&sample_balance()).unwrap();
    let expected = "\
V00001;01/02/2024;000000;;;EUR;0,00;;DEB;;0\r\n\
V00001;01/02/2024;C001;F-1;15/01/2024;EUR;100,00;14/02/2024;FAC;VIR;0\r\n\
V00001;01/02/2024;C001;AV-1;16/01/2024;EUR;-50,00;;AVO;;0\r\n\
V00001;01/02/2024;999999;;;EUR;0,00;;FIN;;0\r\n";
    assert_eq!(String::from_utf8(bytes).unwrap(), expected);
}

#[test]
fn every_line_ends_with_crlf() {
    let bytes = to_bytes(&sample_balance()).unwrap();
    let lf = bytes.iter().filter(|&&b| b == b'\n').count();
    let crlf = bytes.windows(2).filter(|w| *w == b"\r\n").count();
    assert_eq!(lf, 4);
    assert_eq!(crlf, 4);
}

#[test]
fn tiers_uses_windows_1252_and_quotes_delimiters() {
    let org = tiers_row("Lyon");
    let table = TiersTable::new(org.clone(), vec![tiers_row("Sète")], org);
    let bytes = to_bytes(&table).unwrap();

    let line = bytes.split(|&b| b == b'\n').nth(1).unwrap();
    assert_eq!(
        line,
        b"V00001;C001;12345678900011;Martin;\"Martin; fils & Cie\";1 quai;;34200;S\xE8te;FR\r"
    );
}

#[test]
fn unencodable_text_is_an_encoding_error() {
    let org = tiers_row("Lyon");
    let table = TiersTable::new(org.clone(), vec![tiers_row("Łódź")], org);
    assert!(matches!(to_bytes(&table), Err(ExportError::Encoding(_))));
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn round_trip_reproduces_fields() {
    let table = sample_balance();
    let rows = read_interchange(&to_bytes(&table).unwrap()).unwrap();
    assert_eq!(rows.len(), table.len());

    for (read, original) in rows.iter().zip(table.rows()) {
        assert_eq!(read.len(), 11);
        assert_eq!(read[2], original.client_code);
        assert_eq!(read[3], original.document_number);
        assert_eq!(parse_amount(&read[6]), Some(original.amount));
        assert_eq!(read[8], original.document_type.code());
        assert_eq!(read[9], original.payment.code());
    }
}

#[test]
fn round_trip_decodes_accents() {
    let org = tiers_row("Lyon");
    let table = TiersTable::new(org.clone(), vec![tiers_row("Sète")], org);
    let rows = read_interchange(&to_bytes(&table).unwrap()).unwrap();
    assert_eq!(rows[1][8], "Sète");
    assert_eq!(rows[1][4], "Martin; fils & Cie");
}

// ---------------------------------------------------------------------------
// Writing files
// ---------------------------------------------------------------------------

#[test]
fn writes_named_file() {
    let dir = scratch_dir("write");
    let outcome = export_table(
        &sample_balance(),
        FileKind::Balance,
        Some(Scope::Domestic),
        Some(dir.as_path()),
        &ExportConfig::default(),
        date(2024, 2, 1),
    );
    assert!(outcome.success(), "{}", outcome.message());
    let path = outcome.path().unwrap();
    assert_eq!(path, dir.join("BALFR000001F_032.csv"));
    assert_eq!(std::fs::read(path).unwrap(), to_bytes(&sample_balance()).unwrap());
}

#[test]
fn same_day_rerun_overwrites() {
    let dir = scratch_dir("rerun");
    let config = ExportConfig::default();
    let write = || {
        export_table(
            &sample_balance(),
            FileKind::Balance,
            None,
            Some(dir.as_path()),
            &config,
            date(2024, 2, 1),
        )
    };
    let first = write();
    let second = write();
    assert_eq!(first.path(), second.path());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn missing_directory_is_reported_not_raised() {
    let dir = scratch_dir("missing").join("does/not/exist");
    let outcome = export_table(
        &sample_balance(),
        FileKind::Tiers,
        Some(Scope::Foreign),
        Some(dir.as_path()),
        &ExportConfig::default(),
        date(2024, 2, 1),
    );
    assert!(!outcome.success());
    assert!(outcome.message().starts_with("tiers file (foreign) failed: I/O error"));
}

#[test]
fn encoding_failure_writes_nothing() {
    let dir = scratch_dir("encoding");
    let org = tiers_row("Lyon");
    let table = TiersTable::new(org.clone(), vec![tiers_row("Łódź")], org);
    let outcome = export_table(
        &table,
        FileKind::Tiers,
        None,
        Some(dir.as_path()),
        &ExportConfig::default(),
        date(2024, 2, 1),
    );
    assert!(!outcome.success());
    assert!(outcome.message().contains("encoding error"));
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
}
