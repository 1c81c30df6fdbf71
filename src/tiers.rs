//! Tiers builder: one directory row per distinct client of a balance table.

use std::collections::BTreeSet;

use crate::core::{
    BalanceTable, ExportConfig, OrganizationIdentity, TiersRow, TiersTable, is_sentinel_code,
};
use crate::reference::{ClientDirectory, ClientEntry, CountryTable};

/// Maximum field widths of a tiers row, in characters.
pub mod width {
    pub const TAX_ID: usize = 14;
    pub const NAME: usize = 40;
    pub const STREET: usize = 40;
    pub const COMPLEMENT: usize = 40;
    pub const POSTAL_CODE: usize = 6;
    pub const CITY: usize = 34;
}

/// Result of [`build_tiers`].
#[derive(Debug, Clone)]
pub struct TiersBuild {
    /// Organization row, resolved clients in first-seen order, organization row.
    pub table: TiersTable,
    /// Client codes referenced by the balance table but absent from the directory.
    pub unidentified: BTreeSet<String>,
}

/// Build the tiers table for the clients referenced in `balance`.
///
/// Codes are taken in row order; a code already seen is skipped, and the
/// sentinel codes are never looked up. A code missing from `clients` yields
/// no row and is recorded in [`TiersBuild::unidentified`].
pub fn build_tiers(
    balance: &BalanceTable,
    clients: &ClientDirectory,
    countries: &CountryTable,
    config: &ExportConfig,
) -> TiersBuild {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut unidentified = BTreeSet::new();
    let mut rows = Vec::new();

    for row in balance.data() {
        let code = row.client_code.as_str();
        if is_sentinel_code(code) || !seen.insert(code) {
            continue;
        }
        match clients.get(code) {
            Some(entry) => rows.push(client_row(entry, countries, config)),
            None => {
                unidentified.insert(code.to_string());
            }
        }
    }

    if !unidentified.is_empty() {
        tracing::warn!(count = unidentified.len(), "clients missing from directory");
    }
    tracing::debug!(rows = rows.len(), "tiers table built");

    let org = organization_row(&config.vendor_code, &config.organization);
    TiersBuild {
        table: TiersTable::new(org.clone(), rows, org),
        unidentified,
    }
}

fn client_row(entry: &ClientEntry, countries: &CountryTable, config: &ExportConfig) -> TiersRow {
    let text = |value: &Option<String>, max: usize| truncate(value.as_deref().unwrap_or(""), max);
    let name = text(&entry.legal_name, width::NAME);

    let country_code = entry
        .country
        .as_deref()
        .and_then(|c| countries.iso_for(c))
        .unwrap_or(config.domestic_iso.as_str())
        .to_string();

    TiersRow {
        vendor_code: config.vendor_code.clone(),
        client_code: entry.code.clone(),
        tax_id: text(&entry.tax_id, width::TAX_ID),
        short_name: name.clone(),
        legal_name: name,
        street: text(&entry.street, width::STREET),
        complement: text(&entry.complement, width::COMPLEMENT),
        postal_code: text(&entry.postal_code, width::POSTAL_CODE),
        city: text(&entry.city, width::CITY),
        country_code,
    }
}

fn organization_row(vendor_code: &str, org: &OrganizationIdentity) -> TiersRow {
    TiersRow {
        vendor_code: vendor_code.to_string(),
        client_code: org.code.clone(),
        tax_id: org.tax_id.clone(),
        short_name: org.short_name.clone(),
        legal_name: org.legal_name.clone(),
        street: org.street.clone(),
        complement: org.complement.clone(),
        postal_code: org.postal_code.clone(),
        city: org.city.clone(),
        country_code: org.country_code.clone(),
    }
}

/// First `max` characters of `s`.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
