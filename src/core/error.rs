use thiserror::Error;

/// Errors that abort a conversion run before any file is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The source file was rejected before entering the pipeline.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The source or a reference table could not be read.
    #[error("read error: {0}")]
    Read(String),

    /// A cell or field could not be interpreted.
    #[error("parse error at row {row}: {message}")]
    Parse {
        /// 1-based data row in the source (header excluded).
        row: usize,
        /// What went wrong.
        message: String,
    },

    /// A payment-mode text did not start with `C`, `V` or `A`.
    #[error(
        "unrecognized payment mode '{mode}' at row {row} (document '{document}'): expected text starting with C, V or A"
    )]
    UnrecognizedPaymentMode {
        /// 1-based position among the loaded records.
        row: usize,
        /// Document number of the offending record.
        document: String,
        /// The payment-mode text as found.
        mode: String,
    },

    /// A reference table is malformed.
    #[error("reference table error: {0}")]
    Reference(String),

    /// The run configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while serializing or writing an interchange file.
///
/// The exporter never hands these to callers directly; they are folded into
/// an [`ExportOutcome`](crate::export::ExportOutcome).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// Filesystem failure (permissions, missing directory, full disk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A value cannot be represented in the target codepage.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<csv::Error> for ConversionError {
    fn from(e: csv::Error) -> Self {
        Self::Read(e.to_string())
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(e: std::io::Error) -> Self {
        Self::Read(e.to_string())
    }
}
