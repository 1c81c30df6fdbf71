//! One conversion run: validate, load, transform, export, report.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use compta_export::core::ExportConfig;
//! use compta_export::pipeline::{RunRequest, run};
//! use compta_export::reference::{ClientDirectory, CountryTable};
//!
//! let clients = ClientDirectory::from_path(Path::new("clients.csv")).unwrap();
//! let countries = CountryTable::bundled();
//! let request = RunRequest::new("export.xlsx").destination("out");
//!
//! match run(&request, &clients, &countries, &ExportConfig::default()) {
//!     Ok(report) => {
//!         for outcome in &report.exports {
//!             println!("{}", outcome.message());
//!         }
//!         if let Some(warning) = report.unidentified_warning() {
//!             eprintln!("{warning}");
//!         }
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::balance::build_balance;
use crate::core::{BalanceTable, ConversionError, ExportConfig, RawRecord, is_sentinel_code};
use crate::export::{ExportOutcome, FileKind, export_table};
use crate::reference::{ClientDirectory, CountryTable};
use crate::source::load_records;
use crate::split::{Scope, split_by_country};
use crate::tiers::{TiersBuild, build_tiers};

/// What to convert, where to, and as of which day.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source: PathBuf,
    /// Output directory; the current directory when `None`.
    pub destination: Option<PathBuf>,
    /// File date of the rows and day-of-year of the file names.
    pub run_date: NaiveDate,
}

impl RunRequest {
    /// A request for `source`, dated today (local time).
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: None,
            run_date: chrono::Local::now().date_naive(),
        }
    }

    pub fn destination(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination = Some(dir.into());
        self
    }

    pub fn run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = date;
        self
    }
}

/// Balance and tiers tables of one scope.
#[derive(Debug, Clone)]
pub struct ScopeOutput {
    pub scope: Scope,
    pub balance: BalanceTable,
    pub tiers: TiersBuild,
}

/// In-memory result of the transformation, before anything is written.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The full, unsplit balance table.
    pub balance: BalanceTable,
    pub domestic: ScopeOutput,
    pub foreign: ScopeOutput,
}

impl Conversion {
    pub fn scopes(&self) -> [&ScopeOutput; 2] {
        [&self.domestic, &self.foreign]
    }

    /// Unidentified client codes of both scopes, without sentinel codes or
    /// blanks, sorted and distinct.
    pub fn unidentified(&self) -> BTreeSet<String> {
        self.scopes()
            .iter()
            .flat_map(|s| s.tiers.unidentified.iter())
            .filter(|code| !code.trim().is_empty() && !is_sentinel_code(code))
            .cloned()
            .collect()
    }
}

/// Transform loaded records: balance, country split, tiers per scope.
pub fn convert(
    records: &[RawRecord],
    clients: &ClientDirectory,
    countries: &CountryTable,
    config: &ExportConfig,
    run_date: NaiveDate,
) -> Result<Conversion, ConversionError> {
    let balance = build_balance(records, config, run_date)?;
    let (domestic, foreign) = split_by_country(&balance, clients, &config.domestic_country);

    let scope = |scope, balance: BalanceTable| {
        let tiers = build_tiers(&balance, clients, countries, config);
        ScopeOutput {
            scope,
            balance,
            tiers,
        }
    };

    Ok(Conversion {
        domestic: scope(Scope::Domestic, domestic),
        foreign: scope(Scope::Foreign, foreign),
        balance,
    })
}

/// Everything a caller needs to report after a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of source records converted.
    pub records: usize,
    /// One outcome per file attempted, balance before tiers, domestic first.
    pub exports: Vec<ExportOutcome>,
    /// Scopes with no data rows, for which nothing was written.
    pub skipped: Vec<Scope>,
    /// Client codes missing from the directory (sorted, distinct).
    pub unidentified: BTreeSet<String>,
}

impl RunReport {
    /// True when every attempted file was written.
    pub fn all_exported(&self) -> bool {
        self.exports.iter().all(ExportOutcome::success)
    }

    /// Single warning listing the unidentified client codes, if any.
    pub fn unidentified_warning(&self) -> Option<String> {
        if self.unidentified.is_empty() {
            return None;
        }
        let codes: Vec<&str> = self.unidentified.iter().map(String::as_str).collect();
        Some(format!(
            "{} client code(s) not found in the client directory: {}",
            codes.len(),
            codes.join(", ")
        ))
    }
}

/// Run the whole pipeline for one source file.
///
/// Validation, read and classification failures abort the run before any
/// file is written. Export failures do not: each file's outcome is in
/// [`RunReport::exports`], and files already written are kept.
pub fn run(
    request: &RunRequest,
    clients: &ClientDirectory,
    countries: &CountryTable,
    config: &ExportConfig,
) -> Result<RunReport, ConversionError> {
    config.validate()?;
    crate::core::validate_source_file(&request.source)?;

    let records = load_records(&request.source, &config.source)?;
    let conversion = convert(&records, clients, countries, config, request.run_date)?;

    let dest = request.destination.as_deref();
    let mut exports = Vec::new();
    let mut skipped = Vec::new();

    for output in conversion.scopes() {
        if !output.balance.has_data() {
            tracing::info!(scope = %output.scope, "nothing to export");
            skipped.push(output.scope);
            continue;
        }
        exports.push(export_table(
            &output.balance,
            FileKind::Balance,
            Some(output.scope),
            dest,
            config,
            request.run_date,
        ));
        exports.push(export_table(
            &output.tiers.table,
            FileKind::Tiers,
            Some(output.scope),
            dest,
            config,
            request.run_date,
        ));
    }

    let unidentified = conversion.unidentified();
    if !unidentified.is_empty() {
        tracing::warn!(codes = ?unidentified, "unidentified clients");
    }

    Ok(RunReport {
        records: records.len(),
        exports,
        skipped,
        unidentified,
    })
}
