//! Country name → ISO 3166-1 alpha-2 lookup.

use std::collections::HashMap;
use std::path::Path;

use super::{field, read_records};
use crate::core::ConversionError;

/// Default table shipped with the crate (French country names).
const BUNDLED: &str = include_str!("countries_default.csv");

/// Country name → ISO code, read-only for the duration of a run.
///
/// Lookups are exact: `"FRANCE"` and `"France"` are different names.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    codes: HashMap<String, String>,
}

impl CountryTable {
    /// Build a table from `(name, iso)` pairs. The first pair for a name wins.
    pub fn from_pairs<N, C>(pairs: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        let mut codes = HashMap::new();
        for (name, iso) in pairs {
            codes.entry(name.into()).or_insert_with(|| iso.into());
        }
        Self { codes }
    }

    /// The table bundled with the crate.
    pub fn bundled() -> Self {
        // The bundled file is part of the source tree and covered by tests.
        Self::from_bytes(BUNDLED.as_bytes()).unwrap_or_default()
    }

    /// Parse a delimited `{country name, ISO code}` table.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConversionError> {
        let mut pairs = Vec::new();
        for (line, record) in read_records(bytes)? {
            let (Some(name), Some(iso)) = (field(&record, 0), field(&record, 1)) else {
                return Err(ConversionError::Reference(format!(
                    "country table line {line}: expected country name and ISO code"
                )));
            };
            let iso = iso.to_ascii_uppercase();
            if !is_alpha2(&iso) {
                return Err(ConversionError::Reference(format!(
                    "country table line {line}: '{iso}' for {name} is not a 2-letter ISO code"
                )));
            }
            pairs.push((name, iso));
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Read a country table file.
    pub fn from_path(path: &Path) -> Result<Self, ConversionError> {
        let bytes = std::fs::read(path).map_err(|e| {
            ConversionError::Read(format!("country table {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    /// ISO code for an exact country name.
    pub fn iso_for(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// The tiers file has room for exactly two letters of country code.
fn is_alpha2(iso: &str) -> bool {
    iso.len() == 2 && iso.bytes().all(|b| b.is_ascii_uppercase())
}
