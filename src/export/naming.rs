use chrono::{Datelike, NaiveDate};

use crate::core::FileNaming;
use crate::split::Scope;

/// Kind of interchange file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Balance,
    Tiers,
}

impl FileKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Tiers => "tiers",
        }
    }

    fn prefix<'a>(&self, naming: &'a FileNaming) -> &'a str {
        match self {
            Self::Balance => &naming.balance_prefix,
            Self::Tiers => &naming.tiers_prefix,
        }
    }
}

/// Deterministic file name for a kind and scope on `run_date`.
///
/// Two runs on the same calendar day produce the same name, so a rerun
/// replaces the day's file.
pub fn file_name(
    kind: FileKind,
    scope: Option<Scope>,
    naming: &FileNaming,
    run_date: NaiveDate,
) -> String {
    let suffix = match scope {
        Some(Scope::Domestic) => naming.domestic_suffix.as_str(),
        Some(Scope::Foreign) => naming.foreign_suffix.as_str(),
        None => "",
    };
    format!(
        "{}{}{}{}{:03}.{}",
        kind.prefix(naming),
        naming.org_segment,
        suffix,
        naming.separator,
        run_date.ordinal(),
        naming.extension
    )
}
