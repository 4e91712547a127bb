//! Custom error types for foodprint
//!
//! Session-level failures are `FoodprintError`. Per-row failures are
//! `RowParseError`, which the grouping and import passes report and skip
//! rather than propagate.

use thiserror::Error;

/// The main error type for foodprint operations
#[derive(Error, Debug)]
pub enum FoodprintError {
    /// Configuration-related errors (including invalid column layouts)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Generic storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted catalog could not be loaded or saved
    #[error("Catalog I/O error: {0}")]
    CatalogIo(String),

    /// A query needs historical presence data the entry does not have
    #[error("Historical data not initialized for item: {item}")]
    Precondition { item: String },

    /// A single row could not be parsed
    #[error(transparent)]
    RowParse(#[from] RowParseError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),
}

impl FoodprintError {
    /// Create a "not found" error for catalog revisions
    pub fn revision_not_found(number: u32) -> Self {
        Self::NotFound {
            entity_type: "Catalog revision",
            identifier: number.to_string(),
        }
    }

    /// Create a precondition error for an item lacking historical data
    pub fn missing_history(item: impl Into<String>) -> Self {
        Self::Precondition { item: item.into() }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}

impl From<std::io::Error> for FoodprintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FoodprintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for FoodprintError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// A required field of one row could not be read as the expected type
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Error understanding value on row {row}{}: {message}", column_suffix(.column))]
pub struct RowParseError {
    /// Row index within the source
    pub row: usize,
    /// Column that failed, when known
    pub column: Option<usize>,
    /// What went wrong
    pub message: String,
}

impl RowParseError {
    pub fn new(row: usize, column: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            row,
            column,
            message: message.into(),
        }
    }
}

fn column_suffix(column: &Option<usize>) -> String {
    column.map(|col| format!(" (column {})", col)).unwrap_or_default()
}

/// Result type alias for foodprint operations
pub type FoodprintResult<T> = Result<T, FoodprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FoodprintError::Config("bad layout".into());
        assert_eq!(err.to_string(), "Configuration error: bad layout");
    }

    #[test]
    fn test_precondition_error() {
        let err = FoodprintError::missing_history("chix brst");
        assert_eq!(
            err.to_string(),
            "Historical data not initialized for item: chix brst"
        );
        assert!(err.is_precondition());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_row_parse_display() {
        let err = RowParseError::new(7, Some(4), "expected a number, found 'n/a'");
        assert_eq!(
            err.to_string(),
            "Error understanding value on row 7 (column 4): expected a number, found 'n/a'"
        );
        assert_eq!(
            RowParseError::new(2, None, "missing item name").to_string(),
            "Error understanding value on row 2: missing item name"
        );

        let wrapped: FoodprintError = err.into();
        assert!(matches!(wrapped, FoodprintError::RowParse(ref e) if e.row == 7));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FoodprintError = io_err.into();
        assert!(matches!(err, FoodprintError::Io(_)));
    }

    #[test]
    fn test_revision_not_found() {
        let err = FoodprintError::revision_not_found(3);
        assert_eq!(err.to_string(), "Catalog revision not found: 3");
        assert!(err.is_not_found());
    }
}
