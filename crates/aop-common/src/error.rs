//! Error types shared across the AOP workspace

use thiserror::Error;

/// Result type alias for AOP operations
pub type Result<T> = std::result::Result<T, AopError>;

/// Main error type for AOP operations outside the query layer
#[derive(Error, Debug)]
pub enum AopError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid exchange format: {0}")]
    ExchangeFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AopError {
    /// Create an exchange format error
    pub fn exchange_format(msg: impl Into<String>) -> Self {
        Self::ExchangeFormat(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
