//! Run configuration: constants written into every row, the organization's
//! own identity, output file naming and the source column layout.

use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConversionError;

/// Configuration for one conversion run.
///
/// Every field has a default so a TOML file only needs to override what
/// differs:
///
/// ```
/// use compta_export::core::ExportConfig;
///
/// let config = ExportConfig::from_toml_str(r#"
///     vendor_code = "V00042"
///
///     [organization]
///     legal_name = "ACME SARL"
/// "#).unwrap();
/// assert_eq!(config.vendor_code, "V00042");
/// assert_eq!(config.currency, "EUR");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Vendor code written in the first field of every row.
    pub vendor_code: String,
    /// Currency code of all movements (ISO 4217).
    pub currency: String,
    /// Order number written in the last field of every balance row.
    pub order_number: String,
    /// Identity of the issuing organization (tiers sentinel rows).
    pub organization: OrganizationIdentity,
    /// Country name treated as domestic by the country splitter.
    pub domestic_country: String,
    /// ISO code used when a client's country is not in the country table.
    pub domestic_iso: String,
    /// Output file naming.
    pub file_naming: FileNaming,
    /// Where to find each field in the source export.
    pub source: SourceLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            vendor_code: "V00001".into(),
            currency: "EUR".into(),
            order_number: "0".into(),
            organization: OrganizationIdentity::default(),
            domestic_country: "FRANCE".into(),
            domestic_iso: "FR".into(),
            file_naming: FileNaming::default(),
            source: SourceLayout::default(),
        }
    }
}

impl ExportConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConversionError> {
        let config: Self =
            toml::from_str(s).map_err(|e| ConversionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConversionError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConversionError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the constraints the interchange format puts on the constants.
    pub fn validate(&self) -> Result<(), ConversionError> {
        if self.vendor_code.trim().is_empty() {
            return Err(ConversionError::Config("vendor_code must not be empty".into()));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConversionError::Config(format!(
                "currency '{}' must be a 3-letter ISO 4217 code",
                self.currency
            )));
        }
        if self.domestic_country.trim().is_empty() {
            return Err(ConversionError::Config(
                "domestic_country must not be empty".into(),
            ));
        }
        if self.domestic_iso.len() != 2 {
            return Err(ConversionError::Config(format!(
                "domestic_iso '{}' must be a 2-letter ISO 3166-1 code",
                self.domestic_iso
            )));
        }
        self.file_naming.validate()?;
        if self.source.date_formats.is_empty() {
            return Err(ConversionError::Config(
                "source.date_formats must list at least one format".into(),
            ));
        }
        Ok(())
    }
}

/// Literal identity of the issuing organization.
///
/// Written unchanged as the first and last row of every tiers file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationIdentity {
    pub code: String,
    pub tax_id: String,
    pub short_name: String,
    pub legal_name: String,
    pub street: String,
    pub complement: String,
    pub postal_code: String,
    pub city: String,
    pub country_code: String,
}

impl Default for OrganizationIdentity {
    fn default() -> Self {
        Self {
            code: super::types::HEADER_CODE.into(),
            tax_id: String::new(),
            short_name: "ORGANISATION".into(),
            legal_name: "ORGANISATION".into(),
            street: String::new(),
            complement: String::new(),
            postal_code: String::new(),
            city: String::new(),
            country_code: "FR".into(),
        }
    }
}

/// Output filename parts.
///
/// A file is named `{prefix}{org_segment}{scope suffix}{separator}{day of year:03}.csv`,
/// e.g. `BALFR000001F_032.csv` for the domestic balance file written on 1 February.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNaming {
    /// Balance file prefix, 3 letters.
    pub balance_prefix: String,
    /// Tiers file prefix, 3 letters.
    pub tiers_prefix: String,
    /// Organization segment: 2 letters followed by 6 digits.
    pub org_segment: String,
    /// Suffix of domestic files.
    pub domestic_suffix: String,
    /// Suffix of foreign files.
    pub foreign_suffix: String,
    /// Literal between the suffix and the day of year.
    pub separator: String,
    /// File extension, without the dot.
    pub extension: String,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self {
            balance_prefix: "BAL".into(),
            tiers_prefix: "TIE".into(),
            org_segment: "FR000001".into(),
            domestic_suffix: "F".into(),
            foreign_suffix: "E".into(),
            separator: "_".into(),
            extension: "csv".into(),
        }
    }
}

impl FileNaming {
    fn validate(&self) -> Result<(), ConversionError> {
        for (name, prefix) in [
            ("balance_prefix", &self.balance_prefix),
            ("tiers_prefix", &self.tiers_prefix),
        ] {
            if prefix.len() != 3 || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConversionError::Config(format!(
                    "file_naming.{name} '{prefix}' must be 3 letters"
                )));
            }
        }
        let seg = self.org_segment.as_bytes();
        let well_formed = seg.len() == 8
            && seg[..2].iter().all(u8::is_ascii_alphabetic)
            && seg[2..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(ConversionError::Config(format!(
                "file_naming.org_segment '{}' must be 2 letters followed by 6 digits",
                self.org_segment
            )));
        }
        let all_parts = [
            &self.domestic_suffix,
            &self.foreign_suffix,
            &self.separator,
            &self.extension,
        ];
        if all_parts
            .iter()
            .any(|p| p.contains(['/', '\\']) || p.contains(".."))
        {
            return Err(ConversionError::Config(
                "file_naming parts must not contain path separators".into(),
            ));
        }
        Ok(())
    }
}

/// Column headers and formats of the source export.
///
/// Header matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    pub client_code: String,
    pub payment_mode: String,
    pub document_number: String,
    pub document_date: String,
    pub due_date: String,
    pub amount: String,
    /// Field delimiter of CSV sources; taken from the header line when
    /// `None` (`;` if it has one, `,` otherwise).
    pub delimiter: Option<char>,
    /// Worksheet of spreadsheet sources.
    pub sheet: SheetSelector,
    /// `chrono` formats tried, in order, on textual dates.
    pub date_formats: Vec<String>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            client_code: "Code client".into(),
            payment_mode: "Mode de reglement".into(),
            document_number: "Numero".into(),
            document_date: "Date".into(),
            due_date: "Echeance".into(),
            amount: "Montant TTC".into(),
            delimiter: None,
            sheet: SheetSelector::default(),
            date_formats: vec![
                "%d/%m/%Y".into(),
                "%Y-%m-%d".into(),
                "%d.%m.%Y".into(),
                "%d-%m-%Y".into(),
            ],
        }
    }
}

/// Worksheet to read from a spreadsheet source.
///
/// In TOML, `sheet = 2` selects by 0-based position and `sheet = "Factures"`
/// by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "sheet #{i}"),
            Self::Name(name) => write!(f, "sheet '{name}'"),
        }
    }
}

/// A number selects by position, anything else by name.
impl FromStr for SheetSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse() {
            Ok(i) => Self::Index(i),
            Err(_) => Self::Name(s.to_string()),
        })
    }
}

/// Builder for [`ExportConfig`].
///
/// ```
/// use compta_export::core::ExportConfigBuilder;
///
/// let config = ExportConfigBuilder::new("V00042")
///     .order_number("CMD-7")
///     .org_segment("FR123456")
///     .build();
/// assert_eq!(config.file_naming.org_segment, "FR123456");
/// ```
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Start from the defaults with the given vendor code.
    pub fn new(vendor_code: impl Into<String>) -> Self {
        Self {
            config: ExportConfig {
                vendor_code: vendor_code.into(),
                ..Default::default()
            },
        }
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.config.currency = currency.into();
        self
    }

    pub fn order_number(mut self, order: impl Into<String>) -> Self {
        self.config.order_number = order.into();
        self
    }

    pub fn organization(mut self, org: OrganizationIdentity) -> Self {
        self.config.organization = org;
        self
    }

    /// Set the domestic country name and its ISO code.
    pub fn domestic(mut self, country: impl Into<String>, iso: impl Into<String>) -> Self {
        self.config.domestic_country = country.into();
        self.config.domestic_iso = iso.into();
        self
    }

    pub fn org_segment(mut self, segment: impl Into<String>) -> Self {
        self.config.file_naming.org_segment = segment.into();
        self
    }

    pub fn file_naming(mut self, naming: FileNaming) -> Self {
        self.config.file_naming = naming;
        self
    }

    pub fn source_layout(mut self, layout: SourceLayout) -> Self {
        self.config.source = layout;
        self
    }

    pub fn build(self) -> ExportConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ExportConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ExportConfig::from_toml_str("").unwrap();
        assert_eq!(config.domestic_country, "FRANCE");
        assert_eq!(config.file_naming.balance_prefix, "BAL");
        assert_eq!(config.source.delimiter, None);
        assert_eq!(config.source.sheet, SheetSelector::Index(0));
    }

    #[test]
    fn nested_override() {
        let config = ExportConfig::from_toml_str(
            r#"
            [file_naming]
            org_segment = "AB654321"
            foreign_suffix = "X"

            [source]
            amount = "Total"
            "#,
        )
        .unwrap();
        assert_eq!(config.file_naming.org_segment, "AB654321");
        assert_eq!(config.file_naming.foreign_suffix, "X");
        assert_eq!(config.file_naming.domestic_suffix, "F");
        assert_eq!(config.source.amount, "Total");
        assert_eq!(config.source.client_code, "Code client");
    }

    #[test]
    fn sheet_by_index_or_name() {
        let by_index = ExportConfig::from_toml_str("[source]\nsheet = 2\n").unwrap();
        assert_eq!(by_index.source.sheet, SheetSelector::Index(2));

        let by_name = ExportConfig::from_toml_str(
            "[source]\nsheet = \"Factures\"\ndelimiter = \",\"\n",
        )
        .unwrap();
        assert_eq!(by_name.source.sheet, SheetSelector::Name("Factures".into()));
        assert_eq!(by_name.source.delimiter, Some(','));
    }

    #[test]
    fn sheet_from_command_line_text() {
        assert_eq!("1".parse::<SheetSelector>(), Ok(SheetSelector::Index(1)));
        assert_eq!("Avoirs".parse::<SheetSelector>(), Ok(SheetSelector::Name("Avoirs".into())));
    }

    #[test]
    fn rejects_bad_org_segment() {
        for seg in ["FR00001", "F1000001", "FR00000A", "FR0000011"] {
            let config = ExportConfigBuilder::new("V1").org_segment(seg).build();
            assert!(
                matches!(config.validate(), Err(ConversionError::Config(_))),
                "{seg} accepted"
            );
        }
    }

    #[test]
    fn rejects_bad_currency() {
        let config = ExportConfigBuilder::new("V1").currency("euro").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_path_in_suffix() {
        let mut naming = FileNaming::default();
        naming.foreign_suffix = "../x".into();
        let config = ExportConfigBuilder::new("V1").file_naming(naming).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            ExportConfig::from_toml_str("vendor_code = "),
            Err(ConversionError::Config(_))
        ));
    }
}
