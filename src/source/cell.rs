use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A source cell, independent of the file format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Text cell, or [`Cell::Empty`] when blank.
    pub fn text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Render as an identifier. Integral numbers lose their `.0`, so a code
    /// typed as `1042` in a spreadsheet stays `"1042"`.
    pub fn to_code(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.format("%d/%m/%Y").to_string(),
        }
    }

    /// Interpret as a date: native dates as is, text through `formats`.
    pub fn to_date(&self, formats: &[String]) -> Result<Option<NaiveDate>, String> {
        match self {
            Self::Empty => Ok(None),
            Self::Date(d) => Ok(Some(*d)),
            Self::Text(s) => formats
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .map(Some)
                .ok_or_else(|| format!("invalid date '{s}'")),
            Self::Number(n) => Err(format!("invalid date '{n}'")),
        }
    }

    /// Interpret as an amount. Text accepts a decimal comma, space or
    /// period digit grouping and a trailing currency sign.
    pub fn to_amount(&self) -> Result<Decimal, String> {
        match self {
            Self::Empty => Err("amount is empty".to_string()),
            Self::Number(n) => n
                .to_string()
                .parse()
                .map_err(|_| format!("invalid amount '{n}'")),
            Self::Text(s) => parse_amount_text(s).ok_or_else(|| format!("invalid amount '{s}'")),
            Self::Date(d) => Err(format!("invalid amount '{d}'")),
        }
    }
}

fn parse_amount_text(s: &str) -> Option<Decimal> {
    let mut cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();
    if cleaned.contains(',') {
        cleaned = cleaned.replace('.', "").replace(',', ".");
    }
    cleaned.parse().ok()
}
