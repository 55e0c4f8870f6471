//! SPARQL endpoint configuration
//!
//! Values come from the environment (a `.env` file is honoured) and fall
//! back to the public AOP-Wiki RDF and Bgee endpoints. Command-line flags
//! are applied on top with [`QueryConfig::with_overrides`].

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Query Configuration Constants
// ============================================================================

pub const ENV_AOP_WIKI_SPARQL_URL: &str = "AOP_WIKI_SPARQL_URL";
pub const ENV_BGEE_SPARQL_URL: &str = "BGEE_SPARQL_URL";
pub const ENV_SPARQL_TIMEOUT_SECS: &str = "AOP_SPARQL_TIMEOUT_SECS";

/// Public AOP-Wiki RDF endpoint.
pub const DEFAULT_AOP_WIKI_SPARQL_URL: &str = "https://aopwiki.rdf.bigcat-bioinformatics.org/sparql";

/// Public Bgee endpoint.
pub const DEFAULT_BGEE_SPARQL_URL: &str = "https://www.bgee.org/sparql/";

/// Default request timeout in seconds.
pub const DEFAULT_SPARQL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub aop_wiki_url: String,
    pub bgee_url: String,
    pub timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            aop_wiki_url: DEFAULT_AOP_WIKI_SPARQL_URL.to_string(),
            bgee_url: DEFAULT_BGEE_SPARQL_URL.to_string(),
            timeout_secs: DEFAULT_SPARQL_TIMEOUT_SECS,
        }
    }
}

impl QueryConfig {
    /// Load `.env`, then read the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_AOP_WIKI_SPARQL_URL) {
            config.aop_wiki_url = url;
        }
        if let Some(url) = lookup(ENV_BGEE_SPARQL_URL) {
            config.bgee_url = url;
        }
        if let Some(timeout) = lookup(ENV_SPARQL_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                QueryError::config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_SPARQL_TIMEOUT_SECS, timeout
                ))
            })?;
        }

        Ok(config)
    }

    /// Apply command-line values over the loaded ones
    pub fn with_overrides(
        mut self,
        aop_wiki_url: Option<String>,
        bgee_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = aop_wiki_url {
            self.aop_wiki_url = url;
        }
        if let Some(url) = bgee_url {
            self.bgee_url = url;
        }
        if let Some(timeout) = timeout_secs {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.aop_wiki_url.trim().is_empty() {
            return Err(QueryError::config("AOP-Wiki SPARQL URL cannot be empty"));
        }
        if self.bgee_url.trim().is_empty() {
            return Err(QueryError::config("Bgee SPARQL URL cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(QueryError::config("SPARQL timeout must be greater than 0"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
