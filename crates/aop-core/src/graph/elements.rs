// Graph node and edge values

use super::exchange::ElementRecord;
use crate::constants::{EdgeType, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys held as typed node fields, never as free properties
pub const RESERVED_NODE_KEYS: [&str; 3] = ["id", "label", "type"];

/// Keys held as typed edge fields, never as free properties
pub const RESERVED_EDGE_KEYS: [&str; 5] = ["id", "source", "target", "label", "type"];

/// Render a scalar JSON value as a string
///
/// Exchange documents edited by hand or by rendering tools sometimes carry
/// numeric ids.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a list of strings that may also be encoded as a single string
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_string).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn strip_reserved(properties: &Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    properties
        .iter()
        .filter(|(key, _)| !reserved.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// ============================================================================
// Graph Node
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub classes: String,
    /// Extra data keys beyond id/label/type
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: node_type.into(),
            classes: String::new(),
            properties: Map::new(),
        }
    }

    pub fn with_classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = classes.into();
        self
    }

    /// Attach an extra property; reserved keys are ignored
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_NODE_KEYS.contains(&key.as_str()) {
            self.properties.insert(key, value.into());
        }
        self
    }

    pub fn is_type(&self, node_type: NodeType) -> bool {
        self.node_type == node_type.as_str()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// String property, with empty strings treated as absent
    pub fn property_str(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Merge incoming properties; reserved keys never change
    pub fn merge_properties(&mut self, incoming: &Map<String, Value>) {
        for (key, value) in incoming {
            if !RESERVED_NODE_KEYS.contains(&key.as_str()) {
                self.properties.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn to_record(&self) -> ElementRecord {
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(self.id.clone()));
        data.insert("label".to_string(), Value::String(self.label.clone()));
        data.insert("type".to_string(), Value::String(self.node_type.clone()));
        for (key, value) in &self.properties {
            if !RESERVED_NODE_KEYS.contains(&key.as_str()) {
                data.insert(key.clone(), value.clone());
            }
        }

        ElementRecord {
            data,
            classes: (!self.classes.is_empty()).then(|| self.classes.clone()),
            extra: Map::new(),
        }
    }

    /// Build a node from a record; `None` when the record has no id
    pub fn from_record(record: &ElementRecord) -> Option<Self> {
        let id = record.data.get("id").and_then(value_as_string)?;
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id,
            label: record.data_str("label").unwrap_or_default(),
            node_type: record.data_str("type").unwrap_or_default(),
            classes: record.classes.clone().unwrap_or_default(),
            properties: strip_reserved(&record.data, &RESERVED_NODE_KEYS),
        })
    }
}

// ============================================================================
// Graph Edge
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Extra data keys beyond id/source/target/label/type
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
            edge_type: edge_type.into(),
            properties: Map::new(),
        }
    }

    /// Attach an extra property; reserved keys are ignored
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_EDGE_KEYS.contains(&key.as_str()) {
            self.properties.insert(key, value.into());
        }
        self
    }

    pub fn is_type(&self, edge_type: EdgeType) -> bool {
        self.edge_type == edge_type.as_str()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// String property, with empty strings treated as absent
    pub fn property_str(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Merge incoming properties; reserved keys never change
    pub fn merge_properties(&mut self, incoming: &Map<String, Value>) {
        for (key, value) in incoming {
            if !RESERVED_EDGE_KEYS.contains(&key.as_str()) {
                self.properties.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn to_record(&self) -> ElementRecord {
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(self.id.clone()));
        data.insert("source".to_string(), Value::String(self.source.clone()));
        data.insert("target".to_string(), Value::String(self.target.clone()));
        data.insert("label".to_string(), Value::String(self.label.clone()));
        data.insert("type".to_string(), Value::String(self.edge_type.clone()));
        for (key, value) in &self.properties {
            if !RESERVED_EDGE_KEYS.contains(&key.as_str()) {
                data.insert(key.clone(), value.clone());
            }
        }

        ElementRecord {
            data,
            classes: None,
            extra: Map::new(),
        }
    }

    /// Build an edge from a record; `None` unless source and target are set
    ///
    /// A missing id falls back to `<source>_<target>`.
    pub fn from_record(record: &ElementRecord) -> Option<Self> {
        let source = record.data_str("source").filter(|s| !s.is_empty())?;
        let target = record.data_str("target").filter(|t| !t.is_empty())?;
        let id = record
            .data_str("id")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{}_{}", source, target));

        Some(Self {
            id,
            label: record.data_str("label").unwrap_or_default(),
            edge_type: record.data_str("type").unwrap_or_default(),
            properties: strip_reserved(&record.data, &RESERVED_EDGE_KEYS),
            source,
            target,
        })
    }
}

// ============================================================================
// Graph Element
// ============================================================================

/// A node or an edge, as produced by `to_graph_elements`
#[derive(Debug, Clone, PartialEq)]
pub enum GraphElement {
    Node(GraphNode),
    Edge(GraphEdge),
}

impl GraphElement {
    pub fn id(&self) -> &str {
        match self {
            GraphElement::Node(node) => &node.id,
            GraphElement::Edge(edge) => &edge.id,
        }
    }

    pub fn as_node(&self) -> Option<&GraphNode> {
        match self {
            GraphElement::Node(node) => Some(node),
            GraphElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&GraphEdge> {
        match self {
            GraphElement::Edge(edge) => Some(edge),
            GraphElement::Node(_) => None,
        }
    }

    pub fn to_record(&self) -> ElementRecord {
        match self {
            GraphElement::Node(node) => node.to_record(),
            GraphElement::Edge(edge) => edge.to_record(),
        }
    }

    /// Classify a record: an edge iff its data has both `source` and `target`
    pub fn from_record(record: &ElementRecord) -> Option<Self> {
        if record.is_edge() {
            GraphEdge::from_record(record).map(GraphElement::Edge)
        } else {
            GraphNode::from_record(record).map(GraphElement::Node)
        }
    }
}

impl From<GraphNode> for GraphElement {
    fn from(node: GraphNode) -> Self {
        GraphElement::Node(node)
    }
}

impl From<GraphEdge> for GraphElement {
    fn from(edge: GraphEdge) -> Self {
        GraphElement::Edge(edge)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ElementRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_node_record_contains_typed_fields_and_properties() {
        let node = GraphNode::new("gene_BRCA1", "BRCA1", "gene")
            .with_classes("gene-node")
            .with_property("gene_id", "BRCA1")
            .with_property("id", "ignored");

        let rec = node.to_record();
        assert_eq!(rec.data["id"], "gene_BRCA1");
        assert_eq!(rec.data["label"], "BRCA1");
        assert_eq!(rec.data["type"], "gene");
        assert_eq!(rec.data["gene_id"], "BRCA1");
        assert_eq!(rec.classes.as_deref(), Some("gene-node"));
        assert!(!node.properties.contains_key("id"));
    }

    #[test]
    fn test_node_from_record_strips_reserved_keys() {
        let rec = record(json!({
            "data": {"id": "organ_1", "label": "liver", "type": "organ", "anatomical_name": "liver"},
            "classes": "organ-node",
            "position": {"x": 1.0, "y": 2.0}
        }));

        let node = GraphNode::from_record(&rec).unwrap();
        assert_eq!(node.id, "organ_1");
        assert!(node.is_type(NodeType::Organ));
        assert_eq!(node.classes, "organ-node");
        assert_eq!(node.property_str("anatomical_name"), Some("liver"));
        assert!(!node.properties.contains_key("label"));
    }

    #[test]
    fn test_numeric_node_id_is_accepted() {
        let rec = record(json!({"data": {"id": 42, "label": "x"}}));
        let node = GraphNode::from_record(&rec).unwrap();
        assert_eq!(node.id, "42");
        assert_eq!(node.node_type, "");
    }

    #[test]
    fn test_edge_from_record_generates_missing_id() {
        let rec = record(json!({"data": {"source": "a", "target": "b", "type": "part_of"}}));
        let edge = GraphEdge::from_record(&rec).unwrap();
        assert_eq!(edge.id, "a_b");
        assert!(edge.is_type(EdgeType::PartOf));
    }

    #[test]
    fn test_element_classification() {
        let node = record(json!({"data": {"id": "n", "source": "only-source"}}));
        let edge = record(json!({"data": {"id": "e", "source": "a", "target": "b"}}));

        assert!(matches!(GraphElement::from_record(&node), Some(GraphElement::Node(_))));
        assert!(matches!(GraphElement::from_record(&edge), Some(GraphElement::Edge(_))));
    }

    #[test]
    fn test_merge_properties_keeps_reserved_fields() {
        let mut edge = GraphEdge::new("e", "a", "b", "part of", "part_of");
        let incoming = json!({"source": "z", "confidence": "high"});
        edge.merge_properties(incoming.as_object().unwrap());

        assert_eq!(edge.source, "a");
        assert_eq!(edge.property_str("confidence"), Some("high"));
        assert!(!edge.properties.contains_key("source"));
    }

    #[test]
    fn test_string_list_accepts_single_string() {
        assert_eq!(string_list(Some(&json!("a"))), vec!["a".to_string()]);
        assert_eq!(string_list(Some(&json!(["a", "b"]))).len(), 2);
        assert!(string_list(Some(&json!(""))).is_empty());
        assert!(string_list(None).is_empty());
    }
}
