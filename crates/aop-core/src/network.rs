//! AOP network aggregator
//!
//! An [`AopNetwork`] collects key events, relationships and associations as
//! independent queries discover them. Every association added is also merged
//! into the network's own [`ElementStore`], so the same entity found by two
//! queries collapses onto one node.
//!
//! Export re-derives the exchange elements from the typed collections rather
//! than dumping the store; import parses a document once and rebuilds each
//! typed collection from the element index.

use crate::aop_info::{AopInfo, KeyEvent, KeyEventRelationship, KeyEventType};
use crate::associations::{
    Association, ComponentAssociation, CompoundAssociation, GeneAssociation,
    GeneExpressionAssociation, OrganAssociation,
};
use crate::constants::{id_from_uri, NodeType};
use crate::graph::{
    ElementIndex, ElementRecord, ElementStore, ExchangeFormat, GraphEdge, GraphElement, GraphNode,
};
use crate::styles;
use aop_common::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

// ============================================================================
// Network Summary
// ============================================================================

/// Element counts of a network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub total_key_events: usize,
    pub mie_count: usize,
    pub ke_count: usize,
    pub ao_count: usize,
    pub ker_count: usize,
    pub gene_associations: usize,
    pub gene_expression_associations: usize,
    pub compound_associations: usize,
    pub component_associations: usize,
    pub organ_associations: usize,
    pub total_aops: usize,
    pub node_count: usize,
    pub edge_count: usize,
}

impl std::fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Key events: {} (MIE: {}, KE: {}, AO: {})",
            self.total_key_events, self.mie_count, self.ke_count, self.ao_count
        )?;
        writeln!(f, "Relationships: {}", self.ker_count)?;
        writeln!(f, "AOPs: {}", self.total_aops)?;
        writeln!(
            f,
            "Associations: {} genes, {} expression, {} compounds, {} components, {} organs",
            self.gene_associations,
            self.gene_expression_associations,
            self.compound_associations,
            self.component_associations,
            self.organ_associations
        )?;
        write!(f, "Elements: {} nodes, {} edges", self.node_count, self.edge_count)
    }
}

// ============================================================================
// AOP Network
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AopNetwork {
    /// Insertion ordered; `key_event_positions` maps uri -> position
    key_events: Vec<KeyEvent>,
    key_event_positions: HashMap<String, usize>,
    relationships: Vec<KeyEventRelationship>,
    gene_associations: Vec<GeneAssociation>,
    gene_expression_associations: Vec<GeneExpressionAssociation>,
    compound_associations: Vec<CompoundAssociation>,
    component_associations: Vec<ComponentAssociation>,
    organ_associations: Vec<OrganAssociation>,
    aop_info: BTreeMap<String, AopInfo>,
    store: ElementStore,
}

impl AopNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------------

    /// Insert or overwrite a key event by URI and register its AOPs
    pub fn add_key_event(&mut self, key_event: KeyEvent) {
        for aop in key_event.associated_aops() {
            self.register_aop(aop);
        }
        self.store.insert_element(key_event.to_graph_node().into());
        self.put_key_event(key_event);
    }

    /// Append a relationship after making sure both endpoints are known
    ///
    /// An endpoint already present keeps its fields and gains the AOPs of
    /// the incoming snapshot. Relationships are not deduplicated.
    pub fn add_relationship(&mut self, relationship: KeyEventRelationship) {
        self.ensure_key_event(relationship.upstream());
        self.ensure_key_event(relationship.downstream());
        self.store
            .insert_element(relationship.to_graph_edge().into());
        self.relationships.push(relationship);
    }

    pub fn add_gene_association(&mut self, association: GeneAssociation) {
        self.merge_elements(association.to_graph_elements());
        self.gene_associations.push(association);
    }

    pub fn add_gene_expression_association(&mut self, association: GeneExpressionAssociation) {
        self.merge_elements(association.to_graph_elements());
        self.gene_expression_associations.push(association);
    }

    pub fn add_compound_association(&mut self, association: CompoundAssociation) {
        self.merge_elements(association.to_graph_elements());
        self.compound_associations.push(association);
    }

    pub fn add_component_association(&mut self, association: ComponentAssociation) {
        self.merge_elements(association.to_graph_elements());
        self.component_associations.push(association);
    }

    pub fn add_organ_association(&mut self, association: OrganAssociation) {
        self.merge_elements(association.to_graph_elements());
        self.organ_associations.push(association);
    }

    fn ensure_key_event(&mut self, key_event: &KeyEvent) {
        match self.key_event_positions.get(key_event.uri()) {
            Some(&pos) => {
                let mut added = Vec::new();
                for aop in key_event.associated_aops() {
                    if self.key_events[pos].add_aop(aop.clone()) {
                        added.push(aop.clone());
                    }
                }
                for aop in &added {
                    self.register_aop(aop);
                }
                if !added.is_empty() {
                    let node = self.key_events[pos].to_graph_node();
                    self.store.insert_element(node.into());
                }
            },
            None => self.add_key_event(key_event.clone()),
        }
    }

    fn put_key_event(&mut self, key_event: KeyEvent) {
        match self.key_event_positions.get(key_event.uri()) {
            Some(&pos) => self.key_events[pos] = key_event,
            None => {
                self.key_event_positions
                    .insert(key_event.uri().to_string(), self.key_events.len());
                self.key_events.push(key_event);
            },
        }
    }

    /// First descriptor seen for an AOP id wins
    fn register_aop(&mut self, aop: &AopInfo) {
        self.aop_info
            .entry(aop.aop_id().to_string())
            .or_insert_with(|| aop.clone());
    }

    fn merge_elements(&mut self, elements: Vec<GraphElement>) {
        let mut created = 0usize;
        let total = elements.len();
        for element in elements {
            if self.store.insert_element(element) {
                created += 1;
            }
        }
        debug!(total, created, "Merged association elements");
    }

    // ------------------------------------------------------------------------
    // Exchange format
    // ------------------------------------------------------------------------

    /// All elements re-derived from the typed collections
    ///
    /// Order: key events, relationships, genes, compounds, components,
    /// organs, gene expression.
    pub fn graph_elements(&self) -> Vec<GraphElement> {
        let mut elements: Vec<GraphElement> = self
            .key_events
            .iter()
            .map(|ke| ke.to_graph_node().into())
            .collect();
        elements.extend(
            self.relationships
                .iter()
                .map(|rel| GraphElement::from(rel.to_graph_edge())),
        );
        elements.extend(self.gene_associations.iter().flat_map(Association::to_graph_elements));
        elements.extend(self.compound_associations.iter().flat_map(Association::to_graph_elements));
        elements.extend(self.component_associations.iter().flat_map(Association::to_graph_elements));
        elements.extend(self.organ_associations.iter().flat_map(Association::to_graph_elements));
        elements.extend(
            self.gene_expression_associations
                .iter()
                .flat_map(Association::to_graph_elements),
        );
        elements
    }

    pub fn to_exchange_format(&self, include_styles: bool) -> ExchangeFormat {
        let elements: Vec<ElementRecord> = self
            .graph_elements()
            .iter()
            .map(GraphElement::to_record)
            .collect();

        let mut exchange = ExchangeFormat::new(elements);
        if include_styles {
            exchange.style = Some(styles::default_style());
            exchange.layout = Some(styles::default_layout());
        }

        info!(
            nodes = exchange.node_count(),
            edges = exchange.edge_count(),
            include_styles,
            "Exported AOP network"
        );
        exchange
    }

    /// Rebuild a network from exchange elements
    ///
    /// Relationships whose endpoints are not key events in the same
    /// document are dropped.
    pub fn from_exchange_format(records: &[ElementRecord]) -> Self {
        let index = ElementIndex::new(records);
        let mut network = Self::new();

        for element in records.iter().filter_map(GraphElement::from_record) {
            network.store.insert_element(element);
        }

        network.gene_associations = GeneAssociation::from_graph_elements(&index);
        network.gene_expression_associations = GeneExpressionAssociation::from_graph_elements(&index);
        network.compound_associations = CompoundAssociation::from_graph_elements(&index);
        network.component_associations = ComponentAssociation::from_graph_elements(&index);
        network.organ_associations = OrganAssociation::from_graph_elements(&index);

        for aop in AopInfo::from_graph_elements(&index) {
            network.register_aop(&aop);
        }
        for key_event in KeyEvent::from_graph_elements(&index) {
            network.put_key_event(key_event);
        }

        let mut dropped = 0usize;
        for edge in index.edges() {
            if KeyEventRelationship::id_from_graph_edge(edge).is_none() {
                continue;
            }
            match KeyEventRelationship::from_graph_edge(edge, |uri| network.key_event(uri)) {
                Some(relationship) => network.relationships.push(relationship),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!(dropped, "Dropped relationships with unknown endpoints");
        }

        info!(
            key_events = network.key_events.len(),
            relationships = network.relationships.len(),
            aops = network.aop_info.len(),
            "Imported AOP network"
        );
        network
    }

    /// Replace the network with the content of an exchange document
    ///
    /// Accepts a full document, a bare element array or the grouped desktop
    /// form. A document without elements leaves the network unchanged.
    pub fn update_from_json(&mut self, document: &Value) -> Result<()> {
        let exchange = ExchangeFormat::from_value(document.clone())?;
        if exchange.elements.is_empty() {
            warn!("Exchange document has no elements; network left unchanged");
            return Ok(());
        }

        *self = Self::from_exchange_format(&exchange.elements);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Query helpers
    // ------------------------------------------------------------------------

    /// Key event URIs in insertion order
    pub fn get_ke_uris(&self) -> Vec<String> {
        self.key_events.iter().map(|ke| ke.uri().to_string()).collect()
    }

    pub fn get_aop_uris(&self) -> Vec<String> {
        self.aop_info.values().map(|aop| aop.uri().to_string()).collect()
    }

    pub fn get_aop_ids(&self) -> Vec<String> {
        self.aop_info.keys().cloned().collect()
    }

    /// Gene ids from gene nodes, then from gene associations, without repeats
    pub fn get_gene_ids(&self) -> Vec<String> {
        let from_nodes = self
            .store
            .nodes()
            .iter()
            .filter(|node| node.is_type(NodeType::Gene))
            .map(|node| node.property_str("gene_id").unwrap_or(&node.label));
        let from_associations = self.gene_associations.iter().map(GeneAssociation::gene_id);

        unique(from_nodes.chain(from_associations))
    }

    /// Anatomical names of organ nodes, used to scope expression queries
    pub fn get_organ_ids(&self) -> Vec<String> {
        let from_nodes = self
            .store
            .nodes()
            .iter()
            .filter(|node| node.is_type(NodeType::Organ))
            .map(|node| node.property_str("anatomical_name").unwrap_or(&node.label));
        let from_associations = self.organ_associations.iter().map(OrganAssociation::organ_name);

        unique(from_nodes.chain(from_associations))
    }

    pub fn get_genes_for_ke(&self, ke_uri: &str) -> Vec<&GeneAssociation> {
        self.gene_associations
            .iter()
            .filter(|assoc| assoc.ke_uri() == ke_uri)
            .collect()
    }

    /// Compounds of an AOP given by URI or by bare id
    pub fn get_compounds_for_aop(&self, aop: &str) -> Vec<&CompoundAssociation> {
        self.compound_associations
            .iter()
            .filter(|assoc| assoc.aop_uri() == aop || id_from_uri(assoc.aop_uri()) == aop)
            .collect()
    }

    pub fn summary(&self) -> NetworkSummary {
        let count_type = |ke_type: KeyEventType| {
            self.key_events
                .iter()
                .filter(|ke| ke.ke_type() == ke_type)
                .count()
        };

        NetworkSummary {
            total_key_events: self.key_events.len(),
            mie_count: count_type(KeyEventType::Mie),
            ke_count: count_type(KeyEventType::Ke),
            ao_count: count_type(KeyEventType::Ao),
            ker_count: self.relationships.len(),
            gene_associations: self.gene_associations.len(),
            gene_expression_associations: self.gene_expression_associations.len(),
            compound_associations: self.compound_associations.len(),
            component_associations: self.component_associations.len(),
            organ_associations: self.organ_associations.len(),
            total_aops: self.aop_info.len(),
            node_count: self.store.node_count(),
            edge_count: self.store.edge_count(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn key_events(&self) -> &[KeyEvent] {
        &self.key_events
    }

    pub fn key_event(&self, uri: &str) -> Option<&KeyEvent> {
        self.key_event_positions
            .get(uri)
            .and_then(|&pos| self.key_events.get(pos))
    }

    pub fn relationships(&self) -> &[KeyEventRelationship] {
        &self.relationships
    }

    pub fn gene_associations(&self) -> &[GeneAssociation] {
        &self.gene_associations
    }

    pub fn gene_expression_associations(&self) -> &[GeneExpressionAssociation] {
        &self.gene_expression_associations
    }

    pub fn compound_associations(&self) -> &[CompoundAssociation] {
        &self.compound_associations
    }

    pub fn component_associations(&self) -> &[ComponentAssociation] {
        &self.component_associations
    }

    pub fn organ_associations(&self) -> &[OrganAssociation] {
        &self.organ_associations
    }

    /// AOP descriptors keyed by AOP id
    pub fn aop_info(&self) -> &BTreeMap<String, AopInfo> {
        &self.aop_info
    }

    /// Deduplicated nodes in first-seen order
    pub fn node_list(&self) -> &[GraphNode] {
        self.store.nodes()
    }

    /// Deduplicated edges in first-seen order
    pub fn edge_list(&self) -> &[GraphEdge] {
        self.store.edges()
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn is_empty(&self) -> bool {
        self.key_events.is_empty()
            && self.relationships.is_empty()
            && self.store.is_empty()
    }
}

impl std::fmt::Display for AopNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AopNetwork({} KEs, {} KERs, {} AOPs)",
            self.key_events.len(),
            self.relationships.len(),
            self.aop_info.len()
        )
    }
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const AOP_3: &str = "https://identifiers.org/aop/3";
    const MIE: &str = "https://identifiers.org/aop.events/201";
    const KE: &str = "https://identifiers.org/aop.events/888";

    fn key_event(uri: &str, title: &str, ke_type: KeyEventType, aop: Option<(&str, &str)>) -> KeyEvent {
        let mut ke = KeyEvent::from_uri(uri, title, ke_type).unwrap();
        if let Some((aop_uri, aop_title)) = aop {
            ke.add_aop(AopInfo::from_uri(aop_uri, aop_title).unwrap());
        }
        ke
    }

    #[test]
    fn test_add_key_event_registers_aop_first_seen_wins() {
        let mut network = AopNetwork::new();
        network.add_key_event(key_event(MIE, "Binding", KeyEventType::Mie, Some((AOP_3, "First"))));
        network.add_key_event(key_event(KE, "Stress", KeyEventType::Ke, Some((AOP_3, "Second"))));

        assert_eq!(network.aop_info().len(), 1);
        assert_eq!(network.aop_info()["3"].title(), "First");
        assert_eq!(network.get_aop_uris(), vec![AOP_3.to_string()]);
        assert_eq!(network.get_aop_ids(), vec!["3".to_string()]);
    }

    #[test]
    fn test_add_key_event_overwrites_by_uri() {
        let mut network = AopNetwork::new();
        network.add_key_event(key_event(KE, "Old", KeyEventType::Ke, None));
        network.add_key_event(key_event(KE, "New", KeyEventType::Ao, None));

        assert_eq!(network.key_events().len(), 1);
        assert_eq!(network.key_event(KE).unwrap().title(), "New");
        assert_eq!(network.key_event(KE).unwrap().ke_type(), KeyEventType::Ao);
    }

    #[test]
    fn test_add_relationship_registers_endpoints() {
        let mut network = AopNetwork::new();
        let up = key_event(MIE, "Binding", KeyEventType::Mie, Some((AOP_3, "AOP 3")));
        let down = key_event(KE, "Stress", KeyEventType::Ke, None);
        let rel = KeyEventRelationship::new("42", "uri", up.clone(), down.clone()).unwrap();

        network.add_relationship(rel.clone());
        network.add_relationship(rel);

        assert_eq!(network.key_events().len(), 2);
        assert_eq!(network.relationships().len(), 2);
        assert_eq!(network.aop_info().len(), 1);
        for rel in network.relationships() {
            assert!(network.key_event(rel.upstream().uri()).is_some());
            assert!(network.key_event(rel.downstream().uri()).is_some());
        }
    }

    #[test]
    fn test_relationship_merges_aops_into_existing_endpoint() {
        let mut network = AopNetwork::new();
        network.add_key_event(key_event(KE, "Stress", KeyEventType::Ke, Some((AOP_3, "AOP 3"))));

        let up = key_event(MIE, "Binding", KeyEventType::Mie, None);
        let down = key_event(KE, "Stress", KeyEventType::Ke, Some(("https://identifiers.org/aop/9", "AOP 9")));
        network.add_relationship(KeyEventRelationship::new("7", "uri", up, down).unwrap());

        let ke = network.key_event(KE).unwrap();
        assert_eq!(ke.aop_ids(), vec!["3", "9"]);
        assert_eq!(network.aop_info().len(), 2);
    }

    #[test]
    fn test_shared_gene_collapses_to_one_node() {
        let mut network = AopNetwork::new();
        network.add_gene_association(GeneAssociation::new(MIE, "BRCA1", None).unwrap());
        network.add_gene_association(GeneAssociation::new(KE, "BRCA1", None).unwrap());

        let gene_nodes = network
            .node_list()
            .iter()
            .filter(|n| n.id == "gene_BRCA1")
            .count();
        assert_eq!(gene_nodes, 1);
        assert_eq!(network.edge_list().len(), 2);
        assert_eq!(network.get_gene_ids(), vec!["BRCA1".to_string()]);
    }

    #[test]
    fn test_query_helpers() {
        let mut network = AopNetwork::new();
        network.add_gene_association(GeneAssociation::new(KE, "TP53", None).unwrap());
        network.add_gene_association(GeneAssociation::new(MIE, "BRCA1", None).unwrap());
        network.add_compound_association(
            CompoundAssociation::new(AOP_3, "chem").unwrap().with_compound_name("BPA"),
        );
        network.add_organ_association(
            OrganAssociation::for_key_event(KE, "http://purl.obolibrary.org/obo/UBERON_0002107", "liver").unwrap(),
        );

        assert_eq!(network.get_genes_for_ke(KE).len(), 1);
        assert_eq!(network.get_genes_for_ke(KE)[0].gene_id(), "TP53");
        assert_eq!(network.get_compounds_for_aop(AOP_3).len(), 1);
        assert_eq!(network.get_compounds_for_aop("3").len(), 1);
        assert!(network.get_compounds_for_aop("4").is_empty());
        assert_eq!(network.get_organ_ids(), vec!["liver".to_string()]);
    }

    #[test]
    fn test_export_includes_styles_on_request() {
        let mut network = AopNetwork::new();
        network.add_key_event(key_event(KE, "Stress", KeyEventType::Ke, None));

        let styled = network.to_exchange_format(true);
        assert!(styled.style.is_some());
        assert_eq!(styled.layout.as_ref().unwrap().name, "breadthfirst");

        let plain = network.to_exchange_format(false);
        assert!(plain.style.is_none());
        assert_eq!(plain.elements.len(), 1);
    }

    #[test]
    fn test_import_drops_dangling_relationship() {
        let records: Vec<ElementRecord> = vec![
            key_event(KE, "Stress", KeyEventType::Ke, None).to_graph_node().to_record(),
            GraphEdge::new("x", MIE, KE, "5", "ker")
                .with_property("curie", "aop.relationships:5")
                .to_record(),
        ];

        let network = AopNetwork::from_exchange_format(&records);
        assert_eq!(network.key_events().len(), 1);
        assert!(network.relationships().is_empty());
    }

    #[test]
    fn test_update_from_json_accepts_grouped_form() {
        let mut network = AopNetwork::new();
        network
            .update_from_json(&json!({
                "elements": {
                    "nodes": [{"data": {"id": KE, "label": "Stress", "type": "ke"}}],
                    "edges": []
                }
            }))
            .unwrap();
        assert_eq!(network.get_ke_uris(), vec![KE.to_string()]);
    }

    #[test]
    fn test_update_from_empty_document_keeps_state() {
        let mut network = AopNetwork::new();
        network.add_key_event(key_event(KE, "Stress", KeyEventType::Ke, None));

        network.update_from_json(&json!({"elements": []})).unwrap();
        assert_eq!(network.key_events().len(), 1);

        assert!(network.update_from_json(&json!(42)).is_err());
        assert_eq!(network.key_events().len(), 1);
    }

    #[test]
    fn test_summary_and_display() {
        let mut network = AopNetwork::new();
        let up = key_event(MIE, "Binding", KeyEventType::Mie, Some((AOP_3, "AOP 3")));
        let down = key_event(KE, "Stress", KeyEventType::Ao, None);
        network.add_relationship(KeyEventRelationship::new("42", "uri", up, down).unwrap());

        let summary = network.summary();
        assert_eq!(summary.total_key_events, 2);
        assert_eq!(summary.mie_count, 1);
        assert_eq!(summary.ao_count, 1);
        assert_eq!(summary.ker_count, 1);
        assert_eq!(summary.total_aops, 1);
        assert_eq!(network.to_string(), "AopNetwork(2 KEs, 1 KERs, 1 AOPs)");
    }
}
