use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Client code carried by the opening sentinel of every balance table.
pub const HEADER_CODE: &str = "000000";
/// Client code carried by the closing sentinel of every balance table.
pub const TRAILER_CODE: &str = "999999";

/// Returns true for the two placeholder codes used by sentinel rows.
pub fn is_sentinel_code(code: &str) -> bool {
    code == HEADER_CODE || code == TRAILER_CODE
}

/// One invoice or credit note as read from the source export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Client code (key into the client directory).
    pub client_code: String,
    /// Free payment-mode text; only its first character is significant.
    pub payment_mode: String,
    /// Invoice / credit-note number.
    pub document_number: String,
    /// Invoice date.
    pub document_date: NaiveDate,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Gross amount as found in the source (sign is ignored).
    pub gross_amount: Decimal,
}

/// Document type code of a balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// Opening sentinel (`DEB`).
    Header,
    /// Invoice (`FAC`).
    Invoice,
    /// Credit note (`AVO`).
    CreditNote,
    /// Closing sentinel (`FIN`).
    Trailer,
}

impl DocumentType {
    /// Interchange code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Header => "DEB",
            Self::Invoice => "FAC",
            Self::CreditNote => "AVO",
            Self::Trailer => "FIN",
        }
    }
}

/// Payment code of a balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentCode {
    /// Check (`CHE`).
    Check,
    /// Bank transfer (`VIR`).
    Transfer,
    /// No payment code (credit notes and sentinels).
    None,
}

impl PaymentCode {
    /// Interchange code; empty for [`PaymentCode::None`].
    pub fn code(&self) -> &'static str {
        match self {
            Self::Check => "CHE",
            Self::Transfer => "VIR",
            Self::None => "",
        }
    }
}

/// One ledger movement of the balance file (11 fields, in file order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub vendor_code: String,
    pub file_date: NaiveDate,
    pub client_code: String,
    pub document_number: String,
    pub document_date: Option<NaiveDate>,
    pub currency: String,
    /// Signed amount, rounded to 2 decimals.
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub document_type: DocumentType,
    pub payment: PaymentCode,
    pub order_number: String,
}

impl BalanceRow {
    /// True for the `DEB` / `FIN` bracketing rows.
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self.document_type,
            DocumentType::Header | DocumentType::Trailer
        )
    }
}

/// One entry of the tiers (third-party directory) file, 10 fields in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiersRow {
    pub vendor_code: String,
    pub client_code: String,
    /// Max 14 chars.
    pub tax_id: String,
    /// Max 40 chars.
    pub short_name: String,
    /// Max 40 chars.
    pub legal_name: String,
    /// Max 40 chars.
    pub street: String,
    /// Max 40 chars.
    pub complement: String,
    /// Max 6 chars.
    pub postal_code: String,
    /// Max 34 chars.
    pub city: String,
    /// ISO 3166-1 alpha-2.
    pub country_code: String,
}

/// An interchange table: exactly one header row, data rows in order, exactly
/// one trailer row.
///
/// The sentinels are stored apart from the data so the bracketing cannot be
/// lost when rows are filtered or partitioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<R> {
    header: R,
    data: Vec<R>,
    trailer: R,
}

/// Ledger movements bracketed by `DEB` / `FIN` sentinels.
pub type BalanceTable = Table<BalanceRow>;

/// Client directory rows bracketed by the organization's own row.
pub type TiersTable = Table<TiersRow>;

impl<R> Table<R> {
    /// Assemble a table from its three parts.
    pub fn new(header: R, data: Vec<R>, trailer: R) -> Self {
        Self {
            header,
            data,
            trailer,
        }
    }

    pub fn header(&self) -> &R {
        &self.header
    }

    pub fn trailer(&self) -> &R {
        &self.trailer
    }

    /// Rows between the sentinels.
    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Total row count, sentinels included.
    pub fn len(&self) -> usize {
        self.data.len() + 2
    }

    /// Always false: a table holds at least its two sentinels.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether there is anything beyond the sentinels worth exporting.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// All rows in file order: header, data, trailer.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        std::iter::once(&self.header)
            .chain(self.data.iter())
            .chain(std::iter::once(&self.trailer))
    }
}

impl<R: Clone> Table<R> {
    /// A new table with the same sentinels around different data rows.
    pub fn with_data(&self, data: Vec<R>) -> Self {
        Self {
            header: self.header.clone(),
            data,
            trailer: self.trailer.clone(),
        }
    }
}
