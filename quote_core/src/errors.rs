//! # Error Types
//!
//! Structured error types for quote_core. Every failure a front end can hit
//! is a variant here, carrying enough context to point the user back at the
//! offending field or line item.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn check_density(density: f64) -> QuoteResult<()> {
//!     if density <= 0.0 {
//!         return Err(QuoteError::invalid_input(
//!             "filament_density",
//!             density.to_string(),
//!             "Density must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for quoting operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A piece failed pre-calculation validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Imported overhead configuration is malformed or incomplete.
    /// The existing configuration is left untouched.
    #[error("Configuration import failed: {reason}")]
    ConfigImport { reason: String },

    /// A line item id is no longer in the ledger
    #[error("Line item not found: {id}")]
    NotFound { id: String },

    /// An export was requested for a quote with no line items
    #[error("Quote has no pieces to export")]
    EmptyQuote,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (PDF compilation and the like)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigImport error
    pub fn config_import(reason: impl Into<String>) -> Self {
        QuoteError::ConfigImport {
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: impl ToString) -> Self {
        QuoteError::NotFound { id: id.to_string() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::Validation(_) => "VALIDATION",
            QuoteError::ConfigImport { .. } => "CONFIG_IMPORT",
            QuoteError::NotFound { .. } => "NOT_FOUND",
            QuoteError::EmptyQuote => "EMPTY_QUOTE",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuoteError::VersionMismatch { .. } => "VERSION_MISMATCH",
            QuoteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Reasons a piece is rejected before the price calculator runs.
///
/// Checked in declaration order; validation stops at the first failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Name is empty or shorter than the minimum length
    #[error("Please enter a name for the piece")]
    NameRequired,
    /// Print time is zero
    #[error("Please enter a valid print time")]
    TimeRequired,
    /// Filament amount is zero or could not be converted
    #[error("Please enter a valid amount of material")]
    MaterialRequired,
    /// Spool cost is zero
    #[error("Please enter the spool cost")]
    CostRequired,
    /// Printer wattage is zero
    #[error("Please select a printer or enter its power draw")]
    PrinterRequired,
}

impl ValidationError {
    /// Input field the front end should return focus to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "name",
            ValidationError::TimeRequired => "time_hours",
            ValidationError::MaterialRequired => "length_used_meters",
            ValidationError::CostRequired => "spool_cost",
            ValidationError::PrinterRequired => "wattage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = QuoteError::invalid_input("filament_density", "-1.0", "Density must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: QuoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(QuoteError::not_found("abc").error_code(), "NOT_FOUND");
        assert_eq!(QuoteError::config_import("bad").error_code(), "CONFIG_IMPORT");
        assert_eq!(QuoteError::EmptyQuote.error_code(), "EMPTY_QUOTE");
    }

    #[test]
    fn test_validation_converts_to_quote_error() {
        let err: QuoteError = ValidationError::CostRequired.into();
        assert!(matches!(err, QuoteError::Validation(ValidationError::CostRequired)));
        assert_eq!(err.error_code(), "VALIDATION");
    }

    #[test]
    fn test_validation_fields() {
        assert_eq!(ValidationError::NameRequired.field(), "name");
        assert_eq!(ValidationError::PrinterRequired.field(), "wattage");
    }
}
