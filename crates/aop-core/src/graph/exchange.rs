//! Cytoscape exchange format
//!
//! ```text
//! {
//!   "elements": [
//!     {"data": {"id", "label", "type", ...}, "classes"?: str},
//!     {"data": {"id", "source", "target", "label", "type", ...}}
//!   ],
//!   "style"?: [{"selector": str, "style": {...}}],
//!   "layout"?: {"name": str, ...}
//! }
//! ```
//!
//! Documents saved by Cytoscape desktop group elements as
//! `{"elements": {"nodes": [...], "edges": [...]}}`; both shapes and a bare
//! element array are accepted on input. Output always uses the flat list.

use super::elements::{value_as_string, GraphEdge, GraphElement, GraphNode};
use aop_common::{AopError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// Element Record
// ============================================================================

/// One raw element as it appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_classes"
    )]
    pub classes: Option<String>,

    /// Rendering metadata (`position`, `group`, `selected`, ...), kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementRecord {
    /// An element is an edge iff its data has both `source` and `target`
    pub fn is_edge(&self) -> bool {
        self.data.contains_key("source") && self.data.contains_key("target")
    }

    pub fn data_str(&self, key: &str) -> Option<String> {
        self.data.get(key).and_then(value_as_string)
    }
}

/// Cytoscape.js accepts classes as a space separated string or a list
fn deserialize_classes<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(value_as_string)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    })
}

// ============================================================================
// Style and Layout
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub name: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

// ============================================================================
// Exchange Format Document
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeFormat {
    pub elements: Vec<ElementRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Vec<StyleRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ElementsField {
    Flat(Vec<ElementRecord>),
    Grouped {
        #[serde(default)]
        nodes: Vec<ElementRecord>,
        #[serde(default)]
        edges: Vec<ElementRecord>,
    },
}

impl ElementsField {
    fn into_records(self) -> Vec<ElementRecord> {
        match self {
            ElementsField::Flat(records) => records,
            ElementsField::Grouped { mut nodes, edges } => {
                nodes.extend(edges);
                nodes
            },
        }
    }
}

impl ExchangeFormat {
    pub fn new(elements: Vec<ElementRecord>) -> Self {
        Self {
            elements,
            style: None,
            layout: None,
        }
    }

    /// Parse any accepted document shape
    ///
    /// Style and layout entries that do not match the produced shape are
    /// dropped rather than failing the whole document.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let elements: Vec<ElementRecord> = serde_json::from_value(Value::Array(items))?;
                Ok(Self::new(elements))
            },
            Value::Object(mut document) => {
                let elements = document.remove("elements").ok_or_else(|| {
                    AopError::exchange_format("document has no 'elements' field")
                })?;
                let elements: ElementsField = serde_json::from_value(elements).map_err(|e| {
                    AopError::exchange_format(format!("unreadable 'elements' field: {}", e))
                })?;

                let style = document
                    .remove("style")
                    .and_then(|style| serde_json::from_value(style).ok());
                let layout = document
                    .remove("layout")
                    .and_then(|layout| serde_json::from_value(layout).ok());

                Ok(Self {
                    elements: elements.into_records(),
                    style,
                    layout,
                })
            },
            other => Err(AopError::exchange_format(format!(
                "expected an object or an array, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn node_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_edge()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_edge()).count()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Element Index
// ============================================================================

/// Elements parsed once, with nodes indexed by id
///
/// Reconstruction scans edges after the index is complete, so edge order in
/// the source document does not matter. When two nodes share an id the last
/// one wins the index slot.
#[derive(Debug, Default)]
pub struct ElementIndex {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_positions: HashMap<String, usize>,
}

impl ElementIndex {
    pub fn new(records: &[ElementRecord]) -> Self {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for record in records {
            match GraphElement::from_record(record) {
                Some(GraphElement::Node(node)) => {
                    index.node_positions.insert(node.id.clone(), index.nodes.len());
                    index.nodes.push(node);
                },
                Some(GraphElement::Edge(edge)) => index.edges.push(edge),
                None => skipped += 1,
            }
        }

        debug!(
            nodes = index.nodes.len(),
            edges = index.edges.len(),
            skipped,
            "Indexed exchange elements"
        );
        index
    }

    pub fn from_elements(elements: &[GraphElement]) -> Self {
        let records: Vec<ElementRecord> = elements.iter().map(GraphElement::to_record).collect();
        Self::new(&records)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_positions.get(id).and_then(|&pos| self.nodes.get(pos))
    }

    /// Node with the given id whose type is one of `types`
    pub fn node_of_type(&self, id: &str, types: &[&str]) -> Option<&GraphNode> {
        self.node(id)
            .filter(|node| types.contains(&node.node_type.as_str()))
    }

    pub fn nodes_of_type<'a>(&'a self, types: &'a [&str]) -> impl Iterator<Item = &'a GraphNode> {
        self.nodes
            .iter()
            .filter(move |node| types.contains(&node.node_type.as_str()))
    }

    pub fn edges_of_type<'a>(&'a self, types: &'a [&str]) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges
            .iter()
            .filter(move |edge| types.contains(&edge.edge_type.as_str()))
    }
}
