//! Build a network from the SPARQL endpoints
//!
//! The identifier query must succeed. Enrichment steps that fail are
//! reported and skipped so the network is still written with what was
//! collected.

use crate::builder::{AopNetworkBuilder, QueryReport};
use crate::commands::{write_network, write_tables};
use crate::config::QueryConfig;
use crate::error::Result;
use crate::sparql::QueryType;
use crate::BuildArgs;
use aop_core::tables::TableFormat;
use aop_core::NetworkSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of one step as shown to the user
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub step: &'static str,
    pub added: usize,
    pub rejected_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    fn from_result(step: &'static str, result: Result<QueryReport>) -> Self {
        match result {
            Ok(report) => Self {
                step,
                added: report.added,
                rejected_rows: report.failures.len(),
                error: None,
            },
            Err(e) => {
                warn!(step, error = %e, "Skipping enrichment step");
                Self {
                    step,
                    added: 0,
                    rejected_rows: 0,
                    error: Some(e.to_string()),
                }
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub generated_at: DateTime<Utc>,
    pub query_type: String,
    pub steps: Vec<StepOutcome>,
    pub summary: NetworkSummary,
    pub output: PathBuf,
    pub tables: Vec<PathBuf>,
}

pub async fn run(args: &BuildArgs) -> Result<BuildReport> {
    let query_type: QueryType = args.query_type.parse()?;
    // Fail on a bad table format before any network traffic
    let _: TableFormat = args.table_format.parse()?;

    let config = QueryConfig::load()?.with_overrides(
        args.aop_wiki_url.clone(),
        args.bgee_url.clone(),
        args.timeout,
    );
    let mut builder = AopNetworkBuilder::from_config(&config)?;

    let values = args.values.join(" ");
    let identifier = builder
        .query_by_identifier(query_type, &values, &args.statuses)
        .await?;
    let mut steps = vec![StepOutcome::from_result("identifier", Ok(identifier))];

    if args.genes {
        let result = builder.query_genes_for_kes(!args.no_proteins).await;
        steps.push(StepOutcome::from_result("genes", result));
    }
    if args.compounds {
        let result = builder.query_compounds_for_aops().await;
        steps.push(StepOutcome::from_result("compounds", result));
    }
    if args.components {
        let result = builder.query_components_for_kes(args.go_only).await;
        steps.push(StepOutcome::from_result("components", result));
    }
    if args.organs {
        let result = builder.query_organs_for_kes().await;
        steps.push(StepOutcome::from_result("organs", result));
    }
    if args.expression {
        let result = builder.query_gene_expression(args.min_confidence).await;
        steps.push(StepOutcome::from_result("gene_expression", result));
    }

    let network = builder.into_network();
    write_network(&network, &args.output, !args.no_styles)?;
    let tables = match &args.tables_dir {
        Some(dir) => write_tables(&network, dir, &args.table_format)?,
        None => Vec::new(),
    };

    info!(network = %network, "Build finished");
    Ok(BuildReport {
        generated_at: Utc::now(),
        query_type: query_type.to_string(),
        steps,
        summary: network.summary(),
        output: args.output.clone(),
        tables,
    })
}
