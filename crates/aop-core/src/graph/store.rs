//! Deduplicating element store
//!
//! Each [`AopNetwork`](crate::AopNetwork) owns one store. Creating a node
//! whose id is already known, or whose label matches a known node
//! case-insensitively, returns a handle to the existing node and merges the
//! incoming properties into it. Edges deduplicate by id only.
//!
//! Merge rules:
//!
//! - new property keys are added, existing keys are overwritten
//! - `id`, `label` and `type` (and an edge's `source`/`target`) never change
//! - the existing node keeps its classes unless it had none
//!
//! A node matched by label registers the incoming id as an alias, and edges
//! created later against that alias are rewired to the surviving node.

use super::elements::{GraphEdge, GraphElement, GraphNode};
use std::collections::HashMap;
use tracing::debug;

/// Stable reference to a node inside one [`ElementStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

/// Stable reference to an edge inside one [`ElementStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle(usize);

#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// Node id (or alias) -> position
    node_ids: HashMap<String, usize>,
    /// Lowercased label -> position
    node_labels: HashMap<String, usize>,
    edge_ids: HashMap<String, usize>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node matching `node` by id or label, creating it if absent
    pub fn get_or_create_node(&mut self, node: GraphNode) -> NodeHandle {
        let label_key = node.label.to_lowercase();

        let existing = self.node_ids.get(&node.id).copied().or_else(|| {
            (!label_key.is_empty())
                .then(|| self.node_labels.get(&label_key).copied())
                .flatten()
        });

        if let Some(pos) = existing {
            let current = &mut self.nodes[pos];
            if current.id != node.id {
                debug!(alias = %node.id, node = %current.id, "Node matched by label");
                self.node_ids.insert(node.id.clone(), pos);
            }
            current.merge_properties(&node.properties);
            if current.classes.is_empty() && !node.classes.is_empty() {
                current.classes = node.classes;
            }
            return NodeHandle(pos);
        }

        let pos = self.nodes.len();
        self.node_ids.insert(node.id.clone(), pos);
        if !label_key.is_empty() {
            self.node_labels.insert(label_key, pos);
        }
        self.nodes.push(node);
        NodeHandle(pos)
    }

    /// Return the edge with the same id, creating it if absent
    pub fn get_or_create_edge(&mut self, mut edge: GraphEdge) -> EdgeHandle {
        if let Some(&pos) = self.edge_ids.get(&edge.id) {
            self.edges[pos].merge_properties(&edge.properties);
            return EdgeHandle(pos);
        }

        if let Some(source) = self.canonical_node_id(&edge.source) {
            edge.source = source.to_string();
        }
        if let Some(target) = self.canonical_node_id(&edge.target) {
            edge.target = target.to_string();
        }

        let pos = self.edges.len();
        self.edge_ids.insert(edge.id.clone(), pos);
        self.edges.push(edge);
        EdgeHandle(pos)
    }

    /// Insert any element, returning true when it was new
    pub fn insert_element(&mut self, element: GraphElement) -> bool {
        match element {
            GraphElement::Node(node) => {
                let before = self.nodes.len();
                self.get_or_create_node(node);
                self.nodes.len() > before
            },
            GraphElement::Edge(edge) => {
                let before = self.edges.len();
                self.get_or_create_edge(edge);
                self.edges.len() > before
            },
        }
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&GraphNode> {
        self.nodes.get(handle.0)
    }

    pub fn edge(&self, handle: EdgeHandle) -> Option<&GraphEdge> {
        self.edges.get(handle.0)
    }

    /// Look up a node by id or alias
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        self.node_ids.get(id).and_then(|&pos| self.nodes.get(pos))
    }

    pub fn find_edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edge_ids.get(id).and_then(|&pos| self.edges.get(pos))
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_ids.contains_key(id)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Forget every element; handles issued before are invalidated
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_ids.clear();
        self.node_labels.clear();
        self.edge_ids.clear();
    }

    fn canonical_node_id(&self, id: &str) -> Option<&str> {
        self.find_node(id)
            .map(|node| node.id.as_str())
            .filter(|canonical| *canonical != id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_returns_existing_node_and_merges() {
        let mut store = ElementStore::new();
        let first = store.get_or_create_node(
            GraphNode::new("gene_A", "A", "gene").with_property("gene_id", "A"),
        );
        let second = store.get_or_create_node(
            GraphNode::new("gene_A", "renamed", "protein")
                .with_property("gene_id", "A2")
                .with_property("source_db", "ensembl"),
        );

        assert_eq!(first, second);
        assert_eq!(store.node_count(), 1);

        let node = store.node(first).unwrap();
        assert_eq!(node.label, "A");
        assert_eq!(node.node_type, "gene");
        assert_eq!(node.property_str("gene_id"), Some("A2"));
        assert_eq!(node.property_str("source_db"), Some("ensembl"));
    }

    #[test]
    fn test_label_match_is_case_insensitive_and_registers_alias() {
        let mut store = ElementStore::new();
        let organ = store.get_or_create_node(GraphNode::new("UBERON_0002107", "Liver", "organ"));
        let again = store.get_or_create_node(
            GraphNode::new("http://purl.obolibrary.org/obo/UBERON_0002107", "liver", "organ")
                .with_property("anatomical_name", "liver"),
        );

        assert_eq!(organ, again);
        assert_eq!(store.node_count(), 1);
        assert!(store.contains_node("http://purl.obolibrary.org/obo/UBERON_0002107"));
        assert_eq!(
            store.find_node("http://purl.obolibrary.org/obo/UBERON_0002107").unwrap().id,
            "UBERON_0002107"
        );
    }

    #[test]
    fn test_empty_labels_do_not_collapse() {
        let mut store = ElementStore::new();
        store.get_or_create_node(GraphNode::new("a", "", "custom"));
        store.get_or_create_node(GraphNode::new("b", "", "custom"));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn test_edges_dedupe_by_id_and_follow_aliases() {
        let mut store = ElementStore::new();
        store.get_or_create_node(GraphNode::new("organ_1", "heart", "organ"));
        store.get_or_create_node(GraphNode::new("organ_alias", "Heart", "organ"));

        let handle = store.get_or_create_edge(GraphEdge::new(
            "gene_X_organ_alias_expression",
            "gene_X",
            "organ_alias",
            "expressed in (high)",
            "expression_in",
        ));
        store.get_or_create_edge(GraphEdge::new(
            "gene_X_organ_alias_expression",
            "gene_X",
            "elsewhere",
            "ignored",
            "expression_in",
        ));

        assert_eq!(store.edge_count(), 1);
        let edge = store.edge(handle).unwrap();
        assert_eq!(edge.target, "organ_1");
        assert_eq!(edge.source, "gene_X");
    }

    #[test]
    fn test_classes_are_filled_only_when_missing() {
        let mut store = ElementStore::new();
        let handle = store.get_or_create_node(GraphNode::new("n", "N", "organ"));
        store.get_or_create_node(GraphNode::new("n", "N", "organ").with_classes("organ-node"));
        store.get_or_create_node(GraphNode::new("n", "N", "organ").with_classes("other"));
        assert_eq!(store.node(handle).unwrap().classes, "organ-node");
    }

    #[test]
    fn test_reset_and_existence_checks() {
        let mut store = ElementStore::new();
        assert!(store.insert_element(GraphNode::new("n", "N", "gene").into()));
        assert!(!store.insert_element(GraphNode::new("n", "N", "gene").into()));
        assert!(store.insert_element(GraphEdge::new("e", "n", "m", "", "part_of").into()));
        assert!(store.contains_node("n"));
        assert!(store.contains_edge("e"));

        store.reset();
        assert!(store.is_empty());
        assert!(!store.contains_node("n"));
        assert!(!store.contains_edge("e"));
    }
}
