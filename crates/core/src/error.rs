//! Error types for Panelcut.

use thiserror::Error;

/// Result type alias for Panelcut operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during cutlist optimization.
///
/// Expected outcomes (parts that do not fit, an exhausted annealing budget)
/// are reported through [`crate::LayoutResult`], never through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid part specification provided.
    #[error("Invalid part: {0}")]
    InvalidPart(String),

    /// Invalid stock sheet specification provided.
    #[error("Invalid sheet: {0}")]
    InvalidSheet(String),

    /// No sheet type with available stock.
    #[error("No usable sheet type: every sheet type has zero quantity")]
    NoUsableSheet,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A layout violates a geometric invariant.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidPart("P1: length must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid part: P1: length must be positive");

        let err = Error::NoUsableSheet;
        assert!(err.to_string().contains("zero quantity"));
    }
}
