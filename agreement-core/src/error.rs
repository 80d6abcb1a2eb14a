//! Error types for the agreement-core crate.

use thiserror::Error;

/// Top-level error type for loading, scoring, and reporting.
///
/// An empty comparison slice is not an error: it surfaces as empty scores.
#[derive(Debug, Error)]
pub enum AgreementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{column}' in input table")]
    MissingColumn { column: String },

    #[error("Label sequences differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgreementError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<figment::Error> for AgreementError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AgreementError>;
