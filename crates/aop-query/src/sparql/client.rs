//! HTTP SPARQL endpoint client
//!
//! Queries are sent as form-encoded POST requests (SPARQL 1.1 Protocol) and
//! the results are requested as `application/sparql-results+json`.

use crate::error::{QueryError, Result};
use crate::sparql::SparqlEndpoint;
use aop_core::SparqlResults;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// Client Constants
// ============================================================================

/// Media type of SPARQL JSON results
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Longest response body excerpt kept in an HTTP status error
const MAX_ERROR_BODY_CHARS: usize = 500;

const USER_AGENT: &str = concat!("aop-query/", env!("CARGO_PKG_VERSION"));

pub struct HttpSparqlEndpoint {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpSparqlEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| QueryError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, err: reqwest::Error) -> QueryError {
        if err.is_timeout() {
            QueryError::Timeout {
                endpoint: self.url.clone(),
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            QueryError::Connection {
                endpoint: self.url.clone(),
                message: err.to_string(),
            }
        } else {
            QueryError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl SparqlEndpoint for HttpSparqlEndpoint {
    fn name(&self) -> &str {
        &self.url
    }

    async fn select(&self, query: &str) -> Result<SparqlResults> {
        info!(endpoint = %self.url, query_len = query.len(), "Executing SPARQL query");

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!(endpoint = %self.url, status = status.as_u16(), "SPARQL response received");

        let body = response.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            return Err(QueryError::HttpStatus {
                endpoint: self.url.clone(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let results: SparqlResults =
            serde_json::from_str(&body).map_err(|e| QueryError::parse(e.to_string()))?;
        info!(endpoint = %self.url, bindings = results.bindings().len(), "Retrieved SPARQL bindings");
        Ok(results)
    }
}
