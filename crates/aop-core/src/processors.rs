//! SPARQL result bindings to model instances
//!
//! Each processor maps one binding (variable name -> term) to at most one
//! model instance. A row that lacks a required variable did not carry the
//! entity and is skipped without a trace; a row whose values fail entity
//! validation is recorded as a [`RowFailure`] next to the successes.

use crate::aop_info::{AopInfo, KeyEvent, KeyEventRelationship, KeyEventType};
use crate::associations::{
    ComponentAssociation, CompoundAssociation, GeneAssociation, GeneExpressionAssociation,
    OrganAssociation,
};
use crate::constants::{id_from_uri, MISSING_TITLE};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

// ============================================================================
// SPARQL JSON Results
// ============================================================================

/// One RDF term of a binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingValue {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl BindingValue {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
            ..Default::default()
        }
    }
}

/// Variable name -> term; unbound variables are absent
pub type Binding = HashMap<String, BindingValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlBindings {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// `application/sparql-results+json` document of a SELECT query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    #[serde(default)]
    pub results: SparqlBindings,
}

impl SparqlResults {
    pub fn bindings(&self) -> &[Binding] {
        &self.results.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }
}

/// Bound, non-empty value of a variable
pub fn binding_value<'a>(binding: &'a Binding, key: &str) -> Option<&'a str> {
    binding
        .get(key)
        .map(|term| term.value.as_str())
        .filter(|value| !value.is_empty())
}

fn value_or_empty<'a>(binding: &'a Binding, key: &str) -> &'a str {
    binding_value(binding, key).unwrap_or_default()
}

// ============================================================================
// Batches
// ============================================================================

/// A row rejected by entity validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// Zero-based position of the binding in the result set
    pub row: usize,
    #[serde(serialize_with = "serialize_error")]
    pub error: ValidationError,
}

fn serialize_error<S>(error: &ValidationError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(error)
}

impl std::fmt::Display for RowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.error)
    }
}

/// Successes of a processor run together with the rejected rows
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBatch<T> {
    pub items: Vec<T>,
    pub failures: Vec<RowFailure>,
}

impl<T> Default for ProcessedBatch<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> ProcessedBatch<T> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, row: usize, result: Result<T, ValidationError>) {
        match result {
            Ok(item) => self.items.push(item),
            Err(error) => {
                warn!(row, error = %error, "Rejected result row");
                self.failures.push(RowFailure { row, error });
            },
        }
    }
}

/// Entities found by an AOP identifier query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AopBatch {
    pub key_events: Vec<KeyEvent>,
    pub relationships: Vec<KeyEventRelationship>,
    pub aop_infos: Vec<AopInfo>,
    pub failures: Vec<RowFailure>,
}

// ============================================================================
// AOP-Wiki processors
// ============================================================================

/// Key events, relationships and AOPs from AOP identifier query rows
///
/// Rows are expected to bind `aop`, `aop_title`, `MIE`, `MIEtitle`, `ao`,
/// `ao_title`, `KE_upstream(_title)`, `KE_downstream(_title)` and `KER`.
/// An up- or downstream event is typed `ke` unless it is the row's MIE or
/// AO. A key event seen again only gains the row's AOP. A relationship is
/// built once both endpoints are known.
pub fn process_aop_bindings(bindings: &[Binding]) -> AopBatch {
    let mut batch = AopBatch::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (row, binding) in bindings.iter().enumerate() {
        let aop = match (binding_value(binding, "aop"), binding_value(binding, "aop_title")) {
            (Some(uri), Some(title)) => match AopInfo::from_uri(uri, title) {
                Ok(info) => Some(info),
                Err(error) => {
                    batch.failures.push(RowFailure { row, error });
                    None
                },
            },
            _ => None,
        };
        if let Some(info) = &aop {
            if !batch.aop_infos.contains(info) {
                batch.aop_infos.push(info.clone());
            }
        }

        let mie_uri = value_or_empty(binding, "MIE");
        let ao_uri = value_or_empty(binding, "ao");
        let mut events = vec![("MIE", "MIEtitle", KeyEventType::Mie), ("ao", "ao_title", KeyEventType::Ao)];
        for (uri_key, title_key) in [("KE_upstream", "KE_upstream_title"), ("KE_downstream", "KE_downstream_title")] {
            let uri = value_or_empty(binding, uri_key);
            if uri != mie_uri && uri != ao_uri {
                events.push((uri_key, title_key, KeyEventType::Ke));
            }
        }

        for (uri_key, title_key, ke_type) in events {
            let Some(uri) = binding_value(binding, uri_key) else {
                continue;
            };

            if let Some(&pos) = positions.get(uri) {
                if let Some(info) = &aop {
                    batch.key_events[pos].add_aop(info.clone());
                }
                continue;
            }

            let title = binding_value(binding, title_key).unwrap_or(MISSING_TITLE);
            match KeyEvent::from_uri(uri, title, ke_type) {
                Ok(mut key_event) => {
                    if let Some(info) = &aop {
                        key_event.add_aop(info.clone());
                    }
                    positions.insert(uri.to_string(), batch.key_events.len());
                    batch.key_events.push(key_event);
                },
                Err(error) => batch.failures.push(RowFailure { row, error }),
            }
        }

        let endpoints = (
            binding_value(binding, "KER"),
            binding_value(binding, "KE_upstream").and_then(|uri| positions.get(uri)),
            binding_value(binding, "KE_downstream").and_then(|uri| positions.get(uri)),
        );
        if let (Some(ker_uri), Some(&up), Some(&down)) = endpoints {
            let upstream = batch.key_events[up].clone();
            let downstream = batch.key_events[down].clone();
            match KeyEventRelationship::new(id_from_uri(ker_uri), ker_uri, upstream, downstream) {
                Ok(relationship) => batch.relationships.push(relationship),
                Err(error) => {
                    warn!(row, error = %error, "Rejected relationship row");
                    batch.failures.push(RowFailure { row, error });
                },
            }
        }
    }

    debug!(
        rows = bindings.len(),
        key_events = batch.key_events.len(),
        relationships = batch.relationships.len(),
        aops = batch.aop_infos.len(),
        failures = batch.failures.len(),
        "Processed AOP bindings"
    );
    batch
}

/// Rows binding `ke` and `gene`, plus `protein` when proteins are requested
pub fn process_gene_bindings(bindings: &[Binding], include_proteins: bool) -> ProcessedBatch<GeneAssociation> {
    let mut batch = ProcessedBatch::default();

    for (row, binding) in bindings.iter().enumerate() {
        let (Some(ke_uri), Some(gene_id)) = (binding_value(binding, "ke"), binding_value(binding, "gene")) else {
            continue;
        };
        let protein_id = include_proteins
            .then(|| binding_value(binding, "protein").map(str::to_string))
            .flatten();
        batch.record(row, GeneAssociation::new(ke_uri, gene_id, protein_id));
    }
    batch
}

/// Rows binding `aop`, `chemical` and `pubchem_compound`
pub fn process_compound_bindings(bindings: &[Binding]) -> ProcessedBatch<CompoundAssociation> {
    let mut batch = ProcessedBatch::default();

    for (row, binding) in bindings.iter().enumerate() {
        let (Some(aop_uri), Some(chemical_uri), Some(pubchem_compound)) = (
            binding_value(binding, "aop"),
            binding_value(binding, "chemical"),
            binding_value(binding, "pubchem_compound"),
        ) else {
            continue;
        };

        let compound_name = value_or_empty(binding, "compound_name");
        let result = CompoundAssociation::new(aop_uri, chemical_uri).map(|assoc| {
            assoc
                .with_mie(value_or_empty(binding, "mie"))
                .with_pubchem_compound(pubchem_compound)
                .with_compound_name(compound_name)
                .with_chemical_label(compound_name)
                .with_cas_id(binding_value(binding, "cid").map(str::to_string))
        });
        batch.record(row, result);
    }
    batch
}

/// Rows binding `process`; a process without its key event is rejected
pub fn process_component_bindings(bindings: &[Binding]) -> ProcessedBatch<ComponentAssociation> {
    let mut batch = ProcessedBatch::default();

    for (row, binding) in bindings.iter().enumerate() {
        let Some(process) = binding_value(binding, "process") else {
            continue;
        };

        let result = ComponentAssociation::new(value_or_empty(binding, "ke"), process).map(|assoc| {
            assoc
                .with_ke_name(value_or_empty(binding, "ke_name"))
                .with_process_name(value_or_empty(binding, "processName"))
                .with_object(
                    value_or_empty(binding, "object"),
                    value_or_empty(binding, "objectName"),
                    value_or_empty(binding, "objectType"),
                )
                .with_action(value_or_empty(binding, "action"))
        });
        batch.record(row, result);
    }
    batch
}

/// Rows binding `ke` and `organ`, with an optional `organ_name`
pub fn process_organ_bindings(bindings: &[Binding]) -> ProcessedBatch<OrganAssociation> {
    let mut batch = ProcessedBatch::default();

    for (row, binding) in bindings.iter().enumerate() {
        let (Some(ke_uri), Some(organ_uri)) = (binding_value(binding, "ke"), binding_value(binding, "organ")) else {
            continue;
        };
        let organ_name = value_or_empty(binding, "organ_name");
        batch.record(row, OrganAssociation::for_key_event(ke_uri, organ_uri, organ_name));
    }
    batch
}

// ============================================================================
// Bgee processor
// ============================================================================

/// Rows binding `gene_id`; the anatomical entity is validated per row
pub fn process_expression_bindings(bindings: &[Binding]) -> ProcessedBatch<GeneExpressionAssociation> {
    let mut batch = ProcessedBatch::default();

    for (row, binding) in bindings.iter().enumerate() {
        let Some(gene_id) = binding_value(binding, "gene_id") else {
            continue;
        };

        let result = GeneExpressionAssociation::new(
            gene_id,
            value_or_empty(binding, "anatomical_entity_id"),
            value_or_empty(binding, "anatomical_entity_name"),
            value_or_empty(binding, "expression_level"),
        )
        .map(|assoc| {
            assoc
                .with_confidence(
                    value_or_empty(binding, "confidence_level_id"),
                    value_or_empty(binding, "confidence_level_name"),
                )
                .with_developmental_stage(
                    value_or_empty(binding, "developmental_stage_id"),
                    value_or_empty(binding, "developmental_stage_name"),
                )
                .with_expr(value_or_empty(binding, "expr"))
        });
        batch.record(row, result);
    }
    batch
}
