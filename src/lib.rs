//! # compta-export
//!
//! Converts an accounting export of invoices and credit notes into the two
//! fixed-format interchange files of a downstream accounting system:
//!
//! - a **balance** file, one ledger movement per document between `DEB` and
//!   `FIN` sentinel rows;
//! - a **tiers** file, one directory row per distinct client, resolved
//!   against a client directory.
//!
//! Both files are produced separately for domestic and foreign clients.
//! All amounts use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use compta_export::core::*;
//! use compta_export::pipeline::convert;
//! use compta_export::reference::{ClientDirectory, ClientEntry, CountryTable};
//! use rust_decimal_macros::dec;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let records = vec![RawRecord {
//!     client_code: "C001".into(),
//!     payment_mode: "VIREMENT".into(),
//!     document_number: "F-2024-001".into(),
//!     document_date: date,
//!     due_date: NaiveDate::from_ymd_opt(2024, 7, 15),
//!     gross_amount: dec!(1200),
//! }];
//! let clients = ClientDirectory::from_entries([ClientEntry::new("C001", "FRANCE")]);
//!
//! let conversion = convert(&records, &clients, &CountryTable::bundled(), &ExportConfig::default(), date)
//!     .unwrap();
//!
//! assert_eq!(conversion.domestic.balance.len(), 3);
//! assert_eq!(conversion.domestic.tiers.table.len(), 3);
//! assert!(!conversion.foreign.balance.has_data());
//! assert!(conversion.unidentified().is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xlsx` (default) | Read `.xlsx` / `.xls` / `.xlsm` sources |
//! | `cli` | `compta-export` command-line binary |

pub mod balance;
pub mod core;
pub mod export;
pub mod pipeline;
pub mod reference;
pub mod source;
pub mod split;
pub mod tiers;

// Re-export core types at crate root for convenience
pub use crate::core::*;
