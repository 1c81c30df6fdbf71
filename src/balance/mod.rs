//! Balance builder: raw records → ledger movements.
//!
//! Each record becomes one row whose document type and payment code come
//! from [`classify`]. Credit notes carry a negative amount, invoices a
//! positive one, whatever the sign in the source. The table is bracketed by
//! the `000000`/`DEB` and `999999`/`FIN` sentinels.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use compta_export::balance::build_balance;
//! use compta_export::core::*;
//! use rust_decimal_macros::dec;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let records = vec![RawRecord {
//!     client_code: "C001".into(),
//!     payment_mode: "AVOIR".into(),
//!     document_number: "AV-12".into(),
//!     document_date: date,
//!     due_date: None,
//!     gross_amount: dec!(50),
//! }];
//! let table = build_balance(&records, &ExportConfig::default(), date).unwrap();
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.data()[0].amount, dec!(-50.00));
//! ```

mod classify;

pub use classify::{PaymentClass, classify};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::{
    BalanceRow, BalanceTable, ConversionError, DocumentType, ExportConfig, HEADER_CODE,
    PaymentCode, RawRecord, TRAILER_CODE,
};

/// Build the balance table for `records`, dated `file_date`.
///
/// A record whose payment mode does not start with `C`, `V` or `A` aborts
/// the build with [`ConversionError::UnrecognizedPaymentMode`].
pub fn build_balance(
    records: &[RawRecord],
    config: &ExportConfig,
    file_date: NaiveDate,
) -> Result<BalanceTable, ConversionError> {
    let mut rows = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        let class = classify(&record.payment_mode);
        let Some((document_type, payment)) = class.codes() else {
            return Err(ConversionError::UnrecognizedPaymentMode {
                row: i + 1,
                document: record.document_number.clone(),
                mode: record.payment_mode.clone(),
            });
        };

        rows.push(BalanceRow {
            vendor_code: config.vendor_code.clone(),
            file_date,
            client_code: record.client_code.clone(),
            document_number: record.document_number.clone(),
            document_date: Some(record.document_date),
            currency: config.currency.clone(),
            amount: signed_amount(record.gross_amount, document_type),
            due_date: record.due_date,
            document_type,
            payment,
            order_number: config.order_number.clone(),
        });
    }

    tracing::debug!(rows = rows.len(), "balance table built");

    Ok(BalanceTable::new(
        sentinel(HEADER_CODE, DocumentType::Header, config, file_date),
        rows,
        sentinel(TRAILER_CODE, DocumentType::Trailer, config, file_date),
    ))
}

/// |gross| rounded to 2 decimals, negated for credit notes.
///
/// Rounding is half-to-even, as in the source accounting system.
pub fn signed_amount(gross: Decimal, document_type: DocumentType) -> Decimal {
    let magnitude = gross.abs().round_dp(2);
    if document_type == DocumentType::CreditNote && !magnitude.is_zero() {
        -magnitude
    } else {
        magnitude
    }
}

fn sentinel(
    code: &str,
    document_type: DocumentType,
    config: &ExportConfig,
    file_date: NaiveDate,
) -> BalanceRow {
    BalanceRow {
        vendor_code: config.vendor_code.clone(),
        file_date,
        client_code: code.to_string(),
        document_number: String::new(),
        document_date: None,
        currency: config.currency.clone(),
        amount: Decimal::ZERO,
        due_date: None,
        document_type,
        payment: PaymentCode::None,
        order_number: config.order_number.clone(),
    }
}
