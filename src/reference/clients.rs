use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{field, read_records};
use crate::core::ConversionError;

/// Identity of one client as maintained in the client directory.
///
/// Column order in the file: code, tax id, legal name, street, complement,
/// postal code, city, country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub code: String,
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub street: Option<String>,
    pub complement: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// Country name, e.g. "FRANCE" or "BELGIQUE".
    pub country: Option<String>,
}

impl ClientEntry {
    /// An entry with only a code and a country, the minimum the splitter needs.
    pub fn new(code: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            country: Some(country.into()),
            ..Default::default()
        }
    }
}

/// Client code → identity lookup, read-only for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    entries: HashMap<String, ClientEntry>,
}

impl ClientDirectory {
    /// Build a directory from entries. The first entry for a code wins.
    pub fn from_entries(entries: impl IntoIterator<Item = ClientEntry>) -> Self {
        let mut map = HashMap::new();
        for entry in entries {
            if map.contains_key(&entry.code) {
                tracing::warn!(code = %entry.code, "duplicate client code in directory, keeping first");
                continue;
            }
            map.insert(entry.code.clone(), entry);
        }
        Self { entries: map }
    }

    /// Parse a delimited client directory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConversionError> {
        let records = read_records(bytes)?;
        let mut entries = Vec::with_capacity(records.len());
        for (line, record) in records {
            let Some(code) = field(&record, 0) else {
                return Err(ConversionError::Reference(format!(
                    "client directory line {line}: missing client code"
                )));
            };
            entries.push(ClientEntry {
                code,
                tax_id: field(&record, 1),
                legal_name: field(&record, 2),
                street: field(&record, 3),
                complement: field(&record, 4),
                postal_code: field(&record, 5),
                city: field(&record, 6),
                country: field(&record, 7),
            });
        }
        let directory = Self::from_entries(entries);
        tracing::debug!(clients = directory.len(), "client directory loaded");
        Ok(directory)
    }

    /// Read a client directory file.
    pub fn from_path(path: &Path) -> Result<Self, ConversionError> {
        let bytes = std::fs::read(path).map_err(|e| {
            ConversionError::Read(format!("client directory {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn get(&self, code: &str) -> Option<&ClientEntry> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
code;siret;raison sociale;adresse;complement;cp;ville;pays
C001;12345678900011;Boulangerie Martin;1 rue de la Paix;;75002;Paris;FRANCE
B002;;Brasserie Bruxelloise;Grand Place 3;Bat. B;1000;Bruxelles;BELGIQUE
";

    #[test]
    fn parses_all_columns() {
        let dir = ClientDirectory::from_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dir.len(), 2);
        let c = dir.get("C001").unwrap();
        assert_eq!(c.tax_id.as_deref(), Some("12345678900011"));
        assert_eq!(c.legal_name.as_deref(), Some("Boulangerie Martin"));
        assert_eq!(c.complement, None);
        assert_eq!(c.postal_code.as_deref(), Some("75002"));
        assert_eq!(c.country.as_deref(), Some("FRANCE"));

        let b = dir.get("B002").unwrap();
        assert_eq!(b.tax_id, None);
        assert_eq!(b.complement.as_deref(), Some("Bat. B"));
    }

    #[test]
    fn short_rows_leave_fields_empty() {
        let dir = ClientDirectory::from_bytes(b"code;siret\nX9;999\n").unwrap();
        let x = dir.get("X9").unwrap();
        assert_eq!(x.tax_id.as_deref(), Some("999"));
        assert_eq!(x.city, None);
        assert_eq!(x.country, None);
    }

    #[test]
    fn first_duplicate_wins() {
        let dir = ClientDirectory::from_entries([
            ClientEntry::new("A", "FRANCE"),
            ClientEntry::new("A", "ESPAGNE"),
        ]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("A").unwrap().country.as_deref(), Some("FRANCE"));
    }

    #[test]
    fn missing_code_is_an_error() {
        let err = ClientDirectory::from_bytes(b"code;siret\n;123\n").unwrap_err();
        assert!(matches!(err, ConversionError::Reference(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ClientDirectory::from_path(Path::new("/no/such/clients.csv")).unwrap_err();
        assert!(matches!(err, ConversionError::Read(_)));
    }
}
