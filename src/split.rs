//! Domestic / foreign partition of a balance table.

use crate::core::{BalanceRow, BalanceTable};
use crate::reference::ClientDirectory;

/// Which half of a split a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Domestic,
    Foreign,
}

impl Scope {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::Foreign => "foreign",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Split `table` into `(domestic, foreign)` tables.
///
/// A row is foreign only when its client is in the directory with a country
/// other than `domestic_country` (compared case-insensitively). Clients that
/// are missing from the directory, or whose country is absent or blank, stay
/// domestic. Both
/// halves keep the input's sentinels and the relative order of rows.
pub fn split_by_country(
    table: &BalanceTable,
    clients: &ClientDirectory,
    domestic_country: &str,
) -> (BalanceTable, BalanceTable) {
    let (foreign, domestic): (Vec<BalanceRow>, Vec<BalanceRow>) = table
        .data()
        .iter()
        .cloned()
        .partition(|row| is_foreign(row, clients, domestic_country));

    tracing::debug!(
        domestic = domestic.len(),
        foreign = foreign.len(),
        "balance table split by country"
    );

    (table.with_data(domestic), table.with_data(foreign))
}

fn is_foreign(row: &BalanceRow, clients: &ClientDirectory, domestic_country: &str) -> bool {
    clients
        .get(&row.client_code)
        .and_then(|c| c.country.as_deref())
        .map(str::trim)
        .filter(|country| !country.is_empty())
        .is_some_and(|country| !country.eq_ignore_ascii_case(domestic_country))
}
