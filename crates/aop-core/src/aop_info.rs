//! AOP descriptors, key events and key event relationships

use crate::constants::{id_from_uri, is_ke_uri, ker_curie, ker_uri, EdgeType, NodeType};
use crate::error::{require, ValidationError};
use crate::graph::elements::string_list;
use crate::graph::{ElementIndex, GraphEdge, GraphNode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

// ============================================================================
// AOP Info
// ============================================================================

/// Immutable AOP descriptor, identified by `aop_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AopInfo {
    aop_id: String,
    title: String,
    uri: String,
}

impl AopInfo {
    pub fn new(
        aop_id: impl Into<String>,
        title: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let info = Self {
            aop_id: aop_id.into(),
            title: title.into(),
            uri: uri.into(),
        };
        require(&info.aop_id, "AopInfo", "aop_id")?;
        require(&info.uri, "AopInfo", "uri")?;
        Ok(info)
    }

    /// Derive the id from the URI suffix
    pub fn from_uri(uri: impl Into<String>, title: impl Into<String>) -> Result<Self, ValidationError> {
        let uri = uri.into();
        let aop_id = id_from_uri(&uri).to_string();
        Self::new(aop_id, title, uri)
    }

    pub fn aop_id(&self) -> &str {
        &self.aop_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Collect AOP descriptors from the `aop_uris`/`aop_titles` node data
    ///
    /// Both keys may hold a list or a single string. Pairs with an empty
    /// member are skipped; the first descriptor seen for an id wins.
    pub fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        let mut seen = HashSet::new();
        let mut infos = Vec::new();

        for node in index.nodes() {
            for info in aop_pairs(node) {
                if seen.insert(info.aop_id.clone()) {
                    infos.push(info);
                }
            }
        }
        infos
    }
}

impl std::fmt::Display for AopInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AOP(id:{}, title:'{}', URI:{})", self.aop_id, self.title, self.uri)
    }
}

fn aop_pairs(node: &GraphNode) -> Vec<AopInfo> {
    let uris = string_list(node.property("aop_uris"));
    let titles = string_list(node.property("aop_titles"));

    uris.iter()
        .zip(titles.iter())
        .filter(|(uri, title)| !uri.is_empty() && !title.is_empty())
        .filter_map(|(uri, title)| match AopInfo::from_uri(uri.as_str(), title.as_str()) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(node = %node.id, error = %e, "Skipping AOP reference");
                None
            },
        })
        .collect()
}

// ============================================================================
// Key Event
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventType {
    /// Molecular initiating event
    Mie,
    Ke,
    /// Adverse outcome
    Ao,
}

impl KeyEventType {
    pub fn node_type(&self) -> NodeType {
        match self {
            KeyEventType::Mie => NodeType::Mie,
            KeyEventType::Ke => NodeType::Ke,
            KeyEventType::Ao => NodeType::Ao,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.node_type().as_str()
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "mie" => Some(KeyEventType::Mie),
            "ke" => Some(KeyEventType::Ke),
            "ao" => Some(KeyEventType::Ao),
            _ => None,
        }
    }
}

impl std::fmt::Display for KeyEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key event, identified by `uri`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyEvent {
    ke_id: String,
    uri: String,
    title: String,
    ke_type: KeyEventType,
    associated_aops: Vec<AopInfo>,
}

impl KeyEvent {
    /// An empty title falls back to the id
    pub fn new(
        ke_id: impl Into<String>,
        uri: impl Into<String>,
        title: impl Into<String>,
        ke_type: KeyEventType,
    ) -> Result<Self, ValidationError> {
        let ke_id = ke_id.into();
        let uri = uri.into();
        let mut title = title.into();
        require(&ke_id, "KeyEvent", "ke_id")?;
        require(&uri, "KeyEvent", "uri")?;
        if title.is_empty() {
            title = ke_id.clone();
        }

        Ok(Self {
            ke_id,
            uri,
            title,
            ke_type,
            associated_aops: Vec::new(),
        })
    }

    pub fn from_uri(
        uri: impl Into<String>,
        title: impl Into<String>,
        ke_type: KeyEventType,
    ) -> Result<Self, ValidationError> {
        let uri = uri.into();
        let ke_id = id_from_uri(&uri).to_string();
        Self::new(ke_id, uri, title, ke_type)
    }

    pub fn ke_id(&self) -> &str {
        &self.ke_id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn ke_type(&self) -> KeyEventType {
        self.ke_type
    }

    pub fn associated_aops(&self) -> &[AopInfo] {
        &self.associated_aops
    }

    /// Associate an AOP; returns false when it was already associated
    pub fn add_aop(&mut self, aop: AopInfo) -> bool {
        if self.associated_aops.contains(&aop) {
            return false;
        }
        self.associated_aops.push(aop);
        true
    }

    pub fn aop_ids(&self) -> Vec<&str> {
        self.associated_aops.iter().map(AopInfo::aop_id).collect()
    }

    pub fn to_graph_node(&self) -> GraphNode {
        let aop_uris: Vec<Value> = self
            .associated_aops
            .iter()
            .map(|aop| Value::String(aop.uri.clone()))
            .collect();
        let aop_titles: Vec<Value> = self
            .associated_aops
            .iter()
            .map(|aop| Value::String(aop.title.clone()))
            .collect();

        GraphNode::new(&self.uri, &self.title, self.ke_type.as_str())
            .with_property("is_mie", self.ke_type == KeyEventType::Mie)
            .with_property("is_ao", self.ke_type == KeyEventType::Ao)
            .with_property("aop_uris", aop_uris)
            .with_property("aop_titles", aop_titles)
    }

    /// Rebuild a key event from a `mie`/`ke`/`ao` node whose id is a key event URI
    pub fn from_graph_node(node: &GraphNode) -> Option<Self> {
        let ke_type = KeyEventType::from_marker(&node.node_type)?;
        if !is_ke_uri(&node.id) {
            return None;
        }

        let mut key_event = Self::from_uri(node.id.as_str(), node.label.as_str(), ke_type).ok()?;
        for aop in aop_pairs(node) {
            key_event.add_aop(aop);
        }
        Some(key_event)
    }

    pub fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        index.nodes().iter().filter_map(Self::from_graph_node).collect()
    }
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ke_type, self.ke_id)
    }
}

// ============================================================================
// Key Event Relationship
// ============================================================================

/// Directed relationship between two distinct key events
///
/// Holds snapshots of both endpoints; the network's key event map stays the
/// authoritative copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyEventRelationship {
    ker_id: String,
    ker_uri: String,
    upstream: KeyEvent,
    downstream: KeyEvent,
}

impl KeyEventRelationship {
    pub fn new(
        ker_id: impl Into<String>,
        ker_uri: impl Into<String>,
        upstream: KeyEvent,
        downstream: KeyEvent,
    ) -> Result<Self, ValidationError> {
        let ker_id = ker_id.into();
        let ker_uri = ker_uri.into();
        require(&ker_id, "KeyEventRelationship", "ker_id")?;
        require(&ker_uri, "KeyEventRelationship", "ker_uri")?;
        if upstream.uri == downstream.uri {
            return Err(ValidationError::SelfLoop { uri: upstream.uri });
        }

        Ok(Self {
            ker_id,
            ker_uri,
            upstream,
            downstream,
        })
    }

    pub fn ker_id(&self) -> &str {
        &self.ker_id
    }

    pub fn ker_uri(&self) -> &str {
        &self.ker_uri
    }

    pub fn upstream(&self) -> &KeyEvent {
        &self.upstream
    }

    pub fn downstream(&self) -> &KeyEvent {
        &self.downstream
    }

    pub fn curie(&self) -> String {
        ker_curie(&self.ker_id)
    }

    pub fn to_graph_edge(&self) -> GraphEdge {
        GraphEdge::new(
            format!("{}_{}", self.upstream.uri, self.downstream.uri),
            &self.upstream.uri,
            &self.downstream.uri,
            &self.ker_id,
            EdgeType::Ker.as_str(),
        )
        .with_property("curie", self.curie())
        .with_property("ker_label", self.ker_id.as_str())
    }

    /// Relationship id encoded by a `ker` edge: the curie suffix, else `ker_label`
    pub fn id_from_graph_edge(edge: &GraphEdge) -> Option<String> {
        if !edge.is_type(EdgeType::Ker) {
            return None;
        }

        let from_curie = edge
            .property_str("curie")
            .and_then(|curie| curie.rsplit_once(':'))
            .map(|(_, id)| id.to_string());

        from_curie
            .or_else(|| edge.property_str("ker_label").map(str::to_string))
            .filter(|id| !id.is_empty())
    }

    /// Rebuild from a `ker` edge given a lookup of known key events
    pub fn from_graph_edge<'a>(
        edge: &GraphEdge,
        lookup: impl Fn(&str) -> Option<&'a KeyEvent>,
    ) -> Option<Self> {
        let ker_id = Self::id_from_graph_edge(edge)?;
        let upstream = lookup(&edge.source)?.clone();
        let downstream = lookup(&edge.target)?.clone();
        let uri = ker_uri(&ker_id);

        match Self::new(ker_id, uri, upstream, downstream) {
            Ok(rel) => Some(rel),
            Err(e) => {
                warn!(edge = %edge.id, error = %e, "Skipping relationship edge");
                None
            },
        }
    }
}

impl std::fmt::Display for KeyEventRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KER:{}", self.ker_id)
    }
}
