//! Flat table projections of a network
//!
//! Each builder reads the typed collections of an [`AopNetwork`] and returns
//! serializable rows. Missing values are written as `N/A`; AOPs are
//! labelled `AOP:<id>`.

use crate::aop_info::{KeyEvent, KeyEventRelationship};
use crate::associations::{
    ComponentAssociation, CompoundAssociation, GeneExpressionAssociation,
};
use crate::constants::{id_from_uri, NOT_AVAILABLE};
use crate::network::AopNetwork;
use aop_common::{AopError, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

fn or_na(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

fn aop_label(aop_id: &str) -> String {
    format!("AOP:{}", aop_id)
}

// ============================================================================
// Key events and relationships
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyEventRow {
    pub ke_id: String,
    pub uri: String,
    pub title: String,
    pub ke_type: String,
    pub aop_list: String,
    pub aop_titles: String,
}

impl From<&KeyEvent> for KeyEventRow {
    fn from(ke: &KeyEvent) -> Self {
        let (aop_list, aop_titles) = aop_columns([ke]);
        Self {
            ke_id: ke.ke_id().to_string(),
            uri: ke.uri().to_string(),
            title: ke.title().to_string(),
            ke_type: ke.ke_type().to_string(),
            aop_list,
            aop_titles,
        }
    }
}

pub fn key_event_rows(network: &AopNetwork) -> Vec<KeyEventRow> {
    network.key_events().iter().map(KeyEventRow::from).collect()
}

/// One relationship, or one key event that takes part in none
///
/// Rows of disconnected key events leave the relationship and target
/// columns empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipRow {
    pub source_id: String,
    pub source_label: String,
    pub source_type: String,
    pub ker_label: String,
    pub curie: String,
    pub target_id: String,
    pub target_label: String,
    pub target_type: String,
    pub aop_list: String,
    pub aop_titles: String,
    pub is_connected: bool,
}

/// Sorted `AOP:<id>` list and `; `-joined titles over a set of key events
fn aop_columns<'a>(key_events: impl IntoIterator<Item = &'a KeyEvent>) -> (String, String) {
    let mut ids = BTreeSet::new();
    let mut titles = BTreeSet::new();
    for ke in key_events {
        for aop in ke.associated_aops() {
            ids.insert(aop_label(aop.aop_id()));
            titles.insert(aop.title().to_string());
        }
    }

    (
        ids.into_iter().collect::<Vec<_>>().join(","),
        titles.into_iter().collect::<Vec<_>>().join("; "),
    )
}

impl From<&KeyEventRelationship> for RelationshipRow {
    fn from(rel: &KeyEventRelationship) -> Self {
        let up = rel.upstream();
        let down = rel.downstream();
        let (aop_list, aop_titles) = aop_columns([up, down]);

        Self {
            source_id: up.uri().to_string(),
            source_label: up.title().to_string(),
            source_type: up.ke_type().to_string(),
            ker_label: rel.ker_id().to_string(),
            curie: rel.curie(),
            target_id: down.uri().to_string(),
            target_label: down.title().to_string(),
            target_type: down.ke_type().to_string(),
            aop_list: or_na(&aop_list),
            aop_titles: or_na(&aop_titles),
            is_connected: true,
        }
    }
}

pub fn relationship_rows(network: &AopNetwork) -> Vec<RelationshipRow> {
    let mut rows: Vec<RelationshipRow> = network
        .relationships()
        .iter()
        .map(RelationshipRow::from)
        .collect();

    let connected: HashSet<&str> = network
        .relationships()
        .iter()
        .flat_map(|rel| [rel.upstream().uri(), rel.downstream().uri()])
        .collect();

    for ke in network.key_events() {
        if connected.contains(ke.uri()) {
            continue;
        }
        let (aop_list, aop_titles) = aop_columns([ke]);
        rows.push(RelationshipRow {
            source_id: ke.uri().to_string(),
            source_label: ke.title().to_string(),
            source_type: ke.ke_type().to_string(),
            ker_label: String::new(),
            curie: String::new(),
            target_id: String::new(),
            target_label: String::new(),
            target_type: String::new(),
            aop_list,
            aop_titles,
            is_connected: false,
        });
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AopRow {
    pub aop_id: String,
    pub aop_label: String,
    pub title: String,
    pub uri: String,
    pub key_event_count: usize,
}

pub fn aop_rows(network: &AopNetwork) -> Vec<AopRow> {
    network
        .aop_info()
        .values()
        .map(|aop| AopRow {
            aop_id: aop.aop_id().to_string(),
            aop_label: aop_label(aop.aop_id()),
            title: aop.title().to_string(),
            uri: aop.uri().to_string(),
            key_event_count: network
                .key_events()
                .iter()
                .filter(|ke| ke.associated_aops().contains(aop))
                .count(),
        })
        .collect()
}

// ============================================================================
// Genes and expression
// ============================================================================

/// A gene/protein pair with the gene's expression summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneRow {
    pub gene: String,
    pub protein: String,
    pub gene_node_id: String,
    pub protein_node_id: String,
    pub expression_organs: String,
    pub expression_levels: String,
    pub expression_confidence: String,
    pub expression_ids: String,
}

/// Unique gene/protein pairs; genes only seen in expression data come last
pub fn gene_rows(network: &AopNetwork) -> Vec<GeneRow> {
    let mut rows = Vec::new();
    let mut seen_pairs = HashSet::new();
    let mut seen_genes = HashSet::new();

    let pairs = network
        .gene_associations()
        .iter()
        .map(|assoc| (assoc.gene_id(), assoc.protein_id()))
        .chain(
            network
                .gene_expression_associations()
                .iter()
                .map(|assoc| (assoc.gene_id(), None)),
        );

    for (gene_id, protein_id) in pairs {
        if protein_id.is_none() && seen_genes.contains(gene_id) {
            continue;
        }
        if !seen_pairs.insert((gene_id, protein_id)) {
            continue;
        }
        seen_genes.insert(gene_id);

        let expression: Vec<&GeneExpressionAssociation> = network
            .gene_expression_associations()
            .iter()
            .filter(|assoc| assoc.gene_id() == gene_id)
            .collect();
        rows.push(GeneRow {
            gene: gene_id.to_string(),
            protein: or_na(protein_id.unwrap_or_default()),
            gene_node_id: format!("gene_{}", gene_id),
            protein_node_id: protein_id
                .map(|p| format!("protein_{}", p))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            expression_organs: join_expression(&expression, GeneExpressionAssociation::anatomical_name),
            expression_levels: join_expression(&expression, GeneExpressionAssociation::expression_level),
            expression_confidence: join_expression(&expression, GeneExpressionAssociation::confidence_level),
            expression_ids: join_expression(&expression, expr_or_na),
        });
    }
    rows
}

fn join_expression(
    expression: &[&GeneExpressionAssociation],
    field: fn(&GeneExpressionAssociation) -> &str,
) -> String {
    if expression.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    expression
        .iter()
        .map(|assoc| field(assoc))
        .collect::<Vec<_>>()
        .join("; ")
}

fn expr_or_na(assoc: &GeneExpressionAssociation) -> &str {
    if assoc.expr().is_empty() {
        NOT_AVAILABLE
    } else {
        assoc.expr()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionRow {
    pub gene_id: String,
    pub organ: String,
    pub organ_id: String,
    pub expression_level: String,
    pub confidence: String,
    pub developmental_stage: String,
    pub expr_id: String,
}

/// One row per gene/organ pair, first association wins
pub fn expression_rows(network: &AopNetwork) -> Vec<ExpressionRow> {
    let mut seen = HashSet::new();
    network
        .gene_expression_associations()
        .iter()
        .filter(|assoc| seen.insert((assoc.gene_id(), assoc.anatomical_id())))
        .map(|assoc| ExpressionRow {
            gene_id: assoc.gene_id().to_string(),
            organ: assoc.anatomical_name().to_string(),
            organ_id: assoc.anatomical_id().to_string(),
            expression_level: assoc.expression_level().to_string(),
            confidence: assoc.confidence_level().to_string(),
            developmental_stage: assoc.developmental_stage().to_string(),
            expr_id: or_na(assoc.expr()),
        })
        .collect()
}

// ============================================================================
// Compounds and components
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundRow {
    pub compound_name: String,
    pub chemical_label: String,
    pub pubchem_id: String,
    pub pubchem_compound: String,
    pub cas_id: String,
    pub aop_id: String,
    pub aop_uri: String,
    pub mie_uri: String,
    pub chemical_uri: String,
    pub node_id: String,
}

impl From<&CompoundAssociation> for CompoundRow {
    fn from(assoc: &CompoundAssociation) -> Self {
        Self {
            compound_name: assoc.compound_name().to_string(),
            chemical_label: assoc.chemical_label().to_string(),
            pubchem_id: assoc.pubchem_id().to_string(),
            pubchem_compound: assoc.pubchem_compound().to_string(),
            cas_id: or_na(assoc.cas_id().unwrap_or_default()),
            aop_id: aop_label(id_from_uri(assoc.aop_uri())),
            aop_uri: assoc.aop_uri().to_string(),
            mie_uri: assoc.mie_uri().to_string(),
            chemical_uri: assoc.chemical_uri().to_string(),
            node_id: assoc.chemical_node_id(),
        }
    }
}

pub fn compound_rows(network: &AopNetwork) -> Vec<CompoundRow> {
    network
        .compound_associations()
        .iter()
        .map(CompoundRow::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRow {
    pub ke_id: String,
    pub ke_uri: String,
    pub ke_label: String,
    pub process_id: String,
    pub process_name: String,
    pub process_iri: String,
    pub object_id: String,
    pub object_name: String,
    pub object_iri: String,
    pub action: String,
    pub node_id: String,
}

/// One row per component with a process; the label comes from the key event
/// known to the network, else from the association
pub fn component_rows(network: &AopNetwork) -> Vec<ComponentRow> {
    network
        .component_associations()
        .iter()
        .filter(|assoc: &&ComponentAssociation| !assoc.process().is_empty())
        .map(|assoc| {
            let ke_label = network
                .key_event(assoc.ke_uri())
                .map(KeyEvent::title)
                .unwrap_or(assoc.ke_name());

            ComponentRow {
                ke_id: assoc.ke_short_id(),
                ke_uri: assoc.ke_uri().to_string(),
                ke_label: or_na(ke_label),
                process_id: assoc.process_id().to_string(),
                process_name: assoc.process_name().to_string(),
                process_iri: assoc.process().to_string(),
                object_id: or_na(assoc.object_id()),
                object_name: or_na(assoc.object_name()),
                object_iri: or_na(assoc.object()),
                action: or_na(assoc.action()),
                node_id: assoc.process_node_id(),
            }
        })
        .collect()
}

// ============================================================================
// Writers
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormat {
    #[default]
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
        }
    }
}

impl FromStr for TableFormat {
    type Err = AopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "tsv" => Ok(TableFormat::Tsv),
            other => Err(AopError::config(format!("unknown table format '{}'", other))),
        }
    }
}

/// Write rows with a header line taken from the row's field names
pub fn write_table<W: Write, R: Serialize>(writer: W, rows: &[R], format: TableFormat) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_table_file<R: Serialize>(
    dir: &Path,
    name: &str,
    rows: &[R],
    format: TableFormat,
) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let path = dir.join(format!("{}.{}", name, format.extension()));
    write_table(File::create(&path)?, rows, format)?;
    Ok(Some(path))
}

/// Write every non-empty table of the network into `dir`
pub fn write_all_tables(network: &AopNetwork, dir: &Path, format: TableFormat) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let written: Vec<PathBuf> = [
        write_table_file(dir, "key_events", &key_event_rows(network), format)?,
        write_table_file(dir, "relationships", &relationship_rows(network), format)?,
        write_table_file(dir, "aops", &aop_rows(network), format)?,
        write_table_file(dir, "genes", &gene_rows(network), format)?,
        write_table_file(dir, "gene_expression", &expression_rows(network), format)?,
        write_table_file(dir, "compounds", &compound_rows(network), format)?,
        write_table_file(dir, "components", &component_rows(network), format)?,
    ]
    .into_iter()
    .flatten()
    .collect();

    info!(dir = %dir.display(), tables = written.len(), "Wrote network tables");
    Ok(written)
}
