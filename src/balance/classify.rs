//! Payment-mode classification.

use crate::core::{DocumentType, PaymentCode};

/// Classification of a record from the first character of its payment-mode
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentClass {
    /// `C…`: invoice paid by check.
    Check,
    /// `V…`: invoice paid by transfer.
    Transfer,
    /// `A…`: credit note.
    CreditNote,
    /// Anything else, including empty text. Carries the leading character.
    Unrecognized(Option<char>),
}

impl PaymentClass {
    /// Document type and payment code, or `None` for [`PaymentClass::Unrecognized`].
    pub fn codes(self) -> Option<(DocumentType, PaymentCode)> {
        match self {
            Self::Check => Some((DocumentType::Invoice, PaymentCode::Check)),
            Self::Transfer => Some((DocumentType::Invoice, PaymentCode::Transfer)),
            Self::CreditNote => Some((DocumentType::CreditNote, PaymentCode::None)),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Classify a payment-mode text. Leading whitespace is ignored; the letter
/// itself is case-sensitive.
pub fn classify(payment_mode: &str) -> PaymentClass {
    match payment_mode.trim_start().chars().next() {
        Some('C') => PaymentClass::Check,
        Some('V') => PaymentClass::Transfer,
        Some('A') => PaymentClass::CreditNote,
        other => PaymentClass::Unrecognized(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_leading_letters() {
        assert_eq!(classify("CHEQUE"), PaymentClass::Check);
        assert_eq!(classify("C"), PaymentClass::Check);
        assert_eq!(classify("VIR"), PaymentClass::Transfer);
        assert_eq!(classify("Virement 30j"), PaymentClass::Transfer);
        assert_eq!(classify("AVOIR"), PaymentClass::CreditNote);
        assert_eq!(classify("  Avoir"), PaymentClass::CreditNote);
    }

    #[test]
    fn unrecognized() {
        assert_eq!(classify("LCR"), PaymentClass::Unrecognized(Some('L')));
        assert_eq!(classify("cheque"), PaymentClass::Unrecognized(Some('c')));
        assert_eq!(classify(""), PaymentClass::Unrecognized(None));
        assert_eq!(classify("   "), PaymentClass::Unrecognized(None));
    }

    #[test]
    fn codes() {
        assert_eq!(
            PaymentClass::CreditNote.codes(),
            Some((DocumentType::CreditNote, PaymentCode::None))
        );
        assert_eq!(
            PaymentClass::Check.codes(),
            Some((DocumentType::Invoice, PaymentCode::Check))
        );
        assert_eq!(PaymentClass::Unrecognized(Some('X')).codes(), None);
    }
}
