use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Fatal failures of a conversion run.
///
/// Per-line data problems never show up here; they are tallied in
/// [`crate::converter::ProcessingSummary`] and left visible in the sheet.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The uploaded payload could not be read as text in any supported encoding
    #[error("unable to decode input as text (tried UTF-8 and Latin-1): {0}")]
    Decode(String),

    /// The workbook could not be built or serialized
    #[error("workbook error: {0}")]
    Workbook(#[from] XlsxError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a timestamp field produced no calendar value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("not a number: '{0}'")]
    InvalidNumber(String),

    #[error("{0} seconds past the epoch is out of range")]
    Overflow(f64),
}

/// Per-line problems counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    /// Fewer than four `;`-separated fields; the line produced no row
    MalformedLine,
    /// Timestamp unparseable or out of range; the row carries a placeholder
    InvalidTimestamp,
    /// Voltage or temperature did not parse; the row carries the normalized text
    InvalidNumeric,
    /// The line parsed but the sheet had no room left for it, or the write failed
    RowNotWritten,
}
