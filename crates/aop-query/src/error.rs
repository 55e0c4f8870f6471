//! Error types for SPARQL queries and the command-line tool
//!
//! Messages are shown to the user as-is, so they name the endpoint or the
//! setting involved where one exists.

use aop_common::AopError;
use thiserror::Error;

/// Result type alias for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    /// The endpoint did not answer within the configured timeout
    #[error("SPARQL query to {endpoint} timed out after {seconds} seconds")]
    Timeout { endpoint: String, seconds: u64 },

    /// The endpoint could not be reached
    #[error("Failed to connect to SPARQL endpoint {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// The endpoint answered with a non-success status
    #[error("SPARQL endpoint {endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body is not a SPARQL JSON result document
    #[error("Invalid SPARQL response: {0}")]
    Parse(String),

    #[error("Unknown query type '{0}'. Expected one of: aop, mie, ke_upstream, ke_downstream")]
    UnknownQueryType(String),

    /// An enrichment step found nothing in the network to query for
    #[error("No {0} in the network to query")]
    NoInputEntities(&'static str),

    /// Any other HTTP client failure
    #[error("SPARQL request failed: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Model, I/O and serialization failures from the core crates
    #[error(transparent)]
    Core(#[from] AopError),
}

impl QueryError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        Self::Core(AopError::Io(err))
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Core(AopError::Json(err))
    }
}
