//! Progressive network construction from SPARQL endpoints
//!
//! A network starts from an identifier query (AOPs, MIEs or key events) and
//! is widened step by step with genes, compounds, components, organs and
//! Bgee expression calls. Every step reads its inputs from the current
//! network, so the order matters: expression needs genes and organs.
//!
//! A step only touches the network after its query succeeded. A failed step
//! returns the error and leaves the network as it was, so callers can skip
//! it and carry on with the next one.

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::sparql::{templates, HttpSparqlEndpoint, QueryType, SparqlEndpoint};
use aop_core::processors::{
    process_aop_bindings, process_component_bindings, process_compound_bindings,
    process_expression_bindings, process_gene_bindings, process_organ_bindings,
};
use aop_core::{AopNetwork, RowFailure, SparqlResults};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one builder step
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub step: &'static str,
    /// Query text sent to the endpoint
    pub query: String,
    /// Entities added to the network
    pub added: usize,
    pub failures: Vec<RowFailure>,
}

impl QueryReport {
    fn new(step: &'static str, query: String, added: usize, failures: Vec<RowFailure>) -> Self {
        if !failures.is_empty() {
            warn!(step, rejected = failures.len(), "Some result rows were rejected");
        }
        info!(step, added, "Query step finished");
        Self {
            step,
            query,
            added,
            failures,
        }
    }
}

pub struct AopNetworkBuilder {
    network: AopNetwork,
    aop_wiki: Arc<dyn SparqlEndpoint>,
    bgee: Arc<dyn SparqlEndpoint>,
}

impl AopNetworkBuilder {
    pub fn new(aop_wiki: Arc<dyn SparqlEndpoint>, bgee: Arc<dyn SparqlEndpoint>) -> Self {
        Self {
            network: AopNetwork::new(),
            aop_wiki,
            bgee,
        }
    }

    /// HTTP endpoints for AOP-Wiki RDF and Bgee from a validated config
    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        config.validate()?;
        let aop_wiki = HttpSparqlEndpoint::new(&config.aop_wiki_url, config.timeout())?;
        let bgee = HttpSparqlEndpoint::new(&config.bgee_url, config.timeout())?;
        Ok(Self::new(Arc::new(aop_wiki), Arc::new(bgee)))
    }

    /// Start from an existing network instead of an empty one
    pub fn with_network(mut self, network: AopNetwork) -> Self {
        self.network = network;
        self
    }

    pub fn network(&self) -> &AopNetwork {
        &self.network
    }

    pub fn into_network(self) -> AopNetwork {
        self.network
    }

    // ------------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------------

    /// Key events, relationships and AOPs reachable from the given identifiers
    pub async fn query_by_identifier(
        &mut self,
        query_type: QueryType,
        values: &str,
        statuses: &[String],
    ) -> Result<QueryReport> {
        if values.split_whitespace().next().is_none() {
            return Err(QueryError::NoInputEntities("identifiers"));
        }

        let query = templates::aop_identifier_query(query_type, values, statuses);
        let results = select(self.aop_wiki.as_ref(), &query).await?;
        let batch = process_aop_bindings(results.bindings());

        let before = self.network.key_events().len();
        for key_event in batch.key_events {
            self.network.add_key_event(key_event);
        }
        let relationships = batch.relationships.len();
        for relationship in batch.relationships {
            self.network.add_relationship(relationship);
        }
        let added = self.network.key_events().len() - before + relationships;

        Ok(QueryReport::new("identifier", query, added, batch.failures))
    }

    pub async fn query_genes_for_kes(&mut self, include_proteins: bool) -> Result<QueryReport> {
        let ke_uris = self.require_key_events()?;
        let query = templates::gene_query(&ke_uris, include_proteins);
        let results = select(self.aop_wiki.as_ref(), &query).await?;

        let batch = process_gene_bindings(results.bindings(), include_proteins);
        let added = batch.items.len();
        for association in batch.items {
            self.network.add_gene_association(association);
        }
        Ok(QueryReport::new("genes", query, added, batch.failures))
    }

    pub async fn query_compounds_for_aops(&mut self) -> Result<QueryReport> {
        let aop_uris = self.network.get_aop_uris();
        if aop_uris.is_empty() {
            return Err(QueryError::NoInputEntities("AOPs"));
        }
        let query = templates::compound_query(&aop_uris);
        let results = select(self.aop_wiki.as_ref(), &query).await?;

        let batch = process_compound_bindings(results.bindings());
        let added = batch.items.len();
        for association in batch.items {
            self.network.add_compound_association(association);
        }
        Ok(QueryReport::new("compounds", query, added, batch.failures))
    }

    pub async fn query_components_for_kes(&mut self, go_only: bool) -> Result<QueryReport> {
        let ke_uris = self.require_key_events()?;
        let query = templates::component_query(&ke_uris, go_only);
        let results = select(self.aop_wiki.as_ref(), &query).await?;

        let batch = process_component_bindings(results.bindings());
        let added = batch.items.len();
        for association in batch.items {
            self.network.add_component_association(association);
        }
        Ok(QueryReport::new("components", query, added, batch.failures))
    }

    pub async fn query_organs_for_kes(&mut self) -> Result<QueryReport> {
        let ke_uris = self.require_key_events()?;
        let query = templates::organ_query(&ke_uris);
        let results = select(self.aop_wiki.as_ref(), &query).await?;

        let batch = process_organ_bindings(results.bindings());
        let added = batch.items.len();
        for association in batch.items {
            self.network.add_organ_association(association);
        }
        Ok(QueryReport::new("organs", query, added, batch.failures))
    }

    /// Bgee expression of the network's genes in the network's organs
    pub async fn query_gene_expression(&mut self, min_confidence: Option<u8>) -> Result<QueryReport> {
        let gene_ids = self.network.get_gene_ids();
        let organ_names = self.network.get_organ_ids();
        if gene_ids.is_empty() || organ_names.is_empty() {
            return Err(QueryError::NoInputEntities("genes and organs"));
        }

        let query = templates::gene_expression_query(&gene_ids, &organ_names, min_confidence);
        let results = select(self.bgee.as_ref(), &query).await?;

        let batch = process_expression_bindings(results.bindings());
        let added = batch.items.len();
        for association in batch.items {
            self.network.add_gene_expression_association(association);
        }
        Ok(QueryReport::new("gene_expression", query, added, batch.failures))
    }

    /// Replace the network with an exchange-format document
    pub fn update_from_json(&mut self, document: &Value) -> Result<()> {
        self.network.update_from_json(document)?;
        Ok(())
    }

    fn require_key_events(&self) -> Result<Vec<String>> {
        let ke_uris = self.network.get_ke_uris();
        if ke_uris.is_empty() {
            return Err(QueryError::NoInputEntities("key events"));
        }
        Ok(ke_uris)
    }
}

async fn select(endpoint: &dyn SparqlEndpoint, query: &str) -> Result<SparqlResults> {
    endpoint.select(query).await.inspect_err(|e| {
        warn!(endpoint = endpoint.name(), error = %e, "SPARQL query failed");
    })
}
