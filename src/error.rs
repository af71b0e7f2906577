//! Error types for sheetstream conversions

use thiserror::Error;

/// Result type alias for sheetstream operations
pub type Result<T> = std::result::Result<T, SheetError>;

/// Main error type for all conversion operations
///
/// Every variant is fatal for the whole conversion: there is no per-row
/// skip-and-continue and no partial output.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Malformed configuration directive, surfaced before any row is processed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A field cannot be decoded under the declared input encoding
    #[error("Row {row}, column {col}: field is not valid {encoding}")]
    Decode {
        row: u64,
        col: usize,
        encoding: String,
    },

    /// A designated integer column holds a value that is not a valid integer
    #[error("Row {row}, column {col}: '{value}' is not a valid integer")]
    IntegerParse { row: u64, col: usize, value: String },

    /// A designated datetime column holds a value that does not match its input pattern
    #[error("Row {row}, column {col}: '{value}' does not match datetime pattern '{pattern}'")]
    DateTimeParse {
        row: u64,
        col: usize,
        value: String,
        pattern: String,
    },

    /// Malformed delimited input
    #[error("Failed to read delimited input: {0}")]
    Csv(#[from] csv::Error),

    /// Error while assembling the output package
    #[error("Failed to write package: {0}")]
    Package(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for SheetError {
    fn from(err: zip::result::ZipError) -> Self {
        SheetError::Package(err.to_string())
    }
}
