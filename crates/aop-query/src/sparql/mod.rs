//! SPARQL access
//!
//! [`SparqlEndpoint`] is the seam between the network builder and the
//! outside world. [`HttpSparqlEndpoint`] talks to a real endpoint; tests
//! substitute an in-memory implementation.

pub mod client;
pub mod templates;

pub use client::HttpSparqlEndpoint;
pub use templates::QueryType;

use crate::error::Result;
use aop_core::SparqlResults;
use async_trait::async_trait;

/// Something that answers SPARQL SELECT queries
#[async_trait]
pub trait SparqlEndpoint: Send + Sync {
    /// Human-readable endpoint name used in logs and errors
    fn name(&self) -> &str;

    /// Run a SELECT query and decode the JSON result document
    async fn select(&self, query: &str) -> Result<SparqlResults>;
}
