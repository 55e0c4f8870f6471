//! AOP Query
//!
//! Builds Adverse Outcome Pathway networks from AOP-Wiki RDF and Bgee and
//! converts them between the exchange format and flat tables.
//!
//! # Overview
//!
//! - [`sparql`]: the [`sparql::SparqlEndpoint`] seam, its HTTP client and
//!   the query templates
//! - [`builder`]: [`AopNetworkBuilder`], which widens a network step by step
//! - [`config`]: endpoint URLs and timeout from the environment
//! - [`commands`]: the `build`, `convert` and `summary` subcommands
//!
//! # Example
//!
//! ```no_run
//! use aop_query::{AopNetworkBuilder, QueryConfig, QueryType};
//!
//! # async fn example() -> aop_query::Result<()> {
//! let config = QueryConfig::load()?;
//! let mut builder = AopNetworkBuilder::from_config(&config)?;
//! builder.query_by_identifier(QueryType::Aop, "3", &[]).await?;
//! builder.query_genes_for_kes(true).await?;
//! println!("{}", builder.network().summary());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod builder;
pub mod commands;
pub mod config;
pub mod error;
pub mod sparql;

// Re-export commonly used types
pub use builder::{AopNetworkBuilder, QueryReport};
pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use sparql::{HttpSparqlEndpoint, QueryType, SparqlEndpoint};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// AOP network builder for AOP-Wiki RDF and Bgee
#[derive(Parser, Debug)]
#[command(name = "aop-query")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the endpoints and write the network as exchange JSON
    Build(BuildArgs),

    /// Read exchange JSON and write summary and tables (offline)
    Convert {
        /// Exchange JSON file
        input: PathBuf,

        /// Directory to write tables into
        #[arg(short, long)]
        tables_dir: Option<PathBuf>,

        /// Table format (csv, tsv)
        #[arg(short = 'f', long, default_value = "csv")]
        table_format: String,

        /// Also write the normalized network with styles to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print network statistics as JSON
    Summary {
        /// Exchange JSON file
        input: PathBuf,
    },
}

/// Options of the `build` command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// What the identifiers refer to (aop, mie, ke_upstream, ke_downstream)
    #[arg(short = 't', long, default_value = "aop")]
    pub query_type: String,

    /// Space separated identifiers, as bare ids or full URIs
    #[arg(required = true, num_args = 1..)]
    pub values: Vec<String>,

    /// Restrict AOPs to these statuses (repeatable)
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// Add genes mapped to key events
    #[arg(long)]
    pub genes: bool,

    /// Skip proteins when adding genes
    #[arg(long)]
    pub no_proteins: bool,

    /// Add chemical stressors of the AOPs
    #[arg(long)]
    pub compounds: bool,

    /// Add biological process and object annotations
    #[arg(long)]
    pub components: bool,

    /// Only keep Gene Ontology processes
    #[arg(long)]
    pub go_only: bool,

    /// Add organ contexts of key events
    #[arg(long)]
    pub organs: bool,

    /// Add Bgee expression of genes in organs (needs --genes and --organs)
    #[arg(long)]
    pub expression: bool,

    /// Minimum Bgee confidence in percent (20, 50, 80)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_confidence: Option<u8>,

    /// Exchange JSON output file
    #[arg(short, long, default_value = "aop-network.json")]
    pub output: PathBuf,

    /// Leave the style sheet and layout out of the output
    #[arg(long)]
    pub no_styles: bool,

    /// Directory to write tables into
    #[arg(long)]
    pub tables_dir: Option<PathBuf>,

    /// Table format (csv, tsv)
    #[arg(short = 'f', long, default_value = "csv")]
    pub table_format: String,

    /// AOP-Wiki SPARQL endpoint (overrides AOP_WIKI_SPARQL_URL)
    #[arg(long)]
    pub aop_wiki_url: Option<String>,

    /// Bgee SPARQL endpoint (overrides BGEE_SPARQL_URL)
    #[arg(long)]
    pub bgee_url: Option<String>,

    /// Request timeout in seconds (overrides AOP_SPARQL_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout: Option<u64>,
}
