// Biological process / object components of key events

use super::Association;
use crate::constants::{
    id_from_uri, is_component_action, is_ke_uri, EdgeType, NodeType, KE_SHORT_PREFIX,
    ORGAN_CONTEXT_IRI,
};
use crate::error::{require, ValidationError};
use crate::graph::{ElementIndex, GraphEdge, GraphElement, GraphNode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A key event's process, the object it acts on and the action term
///
/// Rows without a process carry no usable component and project to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ComponentAssociation {
    ke_uri: String,
    ke_name: String,
    process: String,
    process_name: String,
    object: String,
    object_name: String,
    action: String,
    object_type: String,
}

impl ComponentAssociation {
    pub fn new(ke_uri: impl Into<String>, process: impl Into<String>) -> Result<Self, ValidationError> {
        let ke_uri = ke_uri.into();
        require(&ke_uri, "ComponentAssociation", "ke_uri")?;

        Ok(Self {
            ke_uri,
            ke_name: String::new(),
            process: process.into(),
            process_name: String::new(),
            object: String::new(),
            object_name: String::new(),
            action: String::new(),
            object_type: String::new(),
        })
    }

    pub fn with_ke_name(mut self, ke_name: impl Into<String>) -> Self {
        self.ke_name = ke_name.into();
        self
    }

    pub fn with_process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name = process_name.into();
        self
    }

    /// Object IRI, its name and the AOP-Wiki context type (may be empty)
    pub fn with_object(
        mut self,
        object: impl Into<String>,
        object_name: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Self {
        self.object = object.into();
        self.object_name = object_name.into();
        self.object_type = object_type.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn ke_uri(&self) -> &str {
        &self.ke_uri
    }

    pub fn ke_name(&self) -> &str {
        &self.ke_name
    }

    pub fn process(&self) -> &str {
        &self.process
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Short key event id used inside element ids, e.g. `aop.events_888`
    pub fn ke_short_id(&self) -> String {
        format!("{}{}", KE_SHORT_PREFIX, id_from_uri(&self.ke_uri))
    }

    pub fn process_id(&self) -> &str {
        id_from_uri(&self.process)
    }

    pub fn object_id(&self) -> &str {
        id_from_uri(&self.object)
    }

    pub fn process_node_id(&self) -> String {
        format!("process_{}", self.process_id())
    }

    pub fn object_node_id(&self) -> String {
        format!("object_{}", self.object_id())
    }

    /// Label of the key event to process edge
    pub fn edge_label(&self) -> &str {
        if is_component_action(&self.action) {
            &self.action
        } else {
            EdgeType::HasProcess.as_str()
        }
    }

    pub fn object_node_type(&self) -> NodeType {
        classify_object(&self.object, &self.object_name, &self.object_type)
    }
}

// ============================================================================
// Object Classification
// ============================================================================

struct ObjectDescriptor<'a> {
    iri: &'a str,
    id: &'a str,
    name: &'a str,
    object_type: &'a str,
}

struct ObjectRule {
    node_type: NodeType,
    matches: fn(&ObjectDescriptor<'_>) -> bool,
}

fn is_organ(o: &ObjectDescriptor<'_>) -> bool {
    o.object_type == ORGAN_CONTEXT_IRI || o.id.contains("FMA") || o.id.contains("UBERON")
}

fn is_cell(o: &ObjectDescriptor<'_>) -> bool {
    o.object_type.contains("CellTypeContext")
        || o.id.contains("CL")
        || o.id.contains("EFO")
        || o.name == "cell"
        || o.name == "mitochondrion"
}

fn is_protein(o: &ObjectDescriptor<'_>) -> bool {
    o.iri.ends_with("PATO_0001241") || o.id.contains("PR")
}

fn is_cellular_component(o: &ObjectDescriptor<'_>) -> bool {
    o.id.contains("GO")
}

/// Checked in order, first match wins; no match means `component_object`
const OBJECT_RULES: [ObjectRule; 4] = [
    ObjectRule {
        node_type: NodeType::Organ,
        matches: is_organ,
    },
    ObjectRule {
        node_type: NodeType::Cell,
        matches: is_cell,
    },
    ObjectRule {
        node_type: NodeType::Protein,
        matches: is_protein,
    },
    ObjectRule {
        node_type: NodeType::CellularComponent,
        matches: is_cellular_component,
    },
];

/// Infer the node type of a component object
///
/// AOP-Wiki RDF types some objects inconsistently, so the IRI suffix is
/// matched against ontology prefixes (UBERON, CL, PR, GO, ...) as well.
pub fn classify_object(object_iri: &str, object_name: &str, object_type: &str) -> NodeType {
    let descriptor = ObjectDescriptor {
        iri: object_iri,
        id: id_from_uri(object_iri),
        name: object_name,
        object_type,
    };

    OBJECT_RULES
        .iter()
        .find(|rule| (rule.matches)(&descriptor))
        .map(|rule| rule.node_type)
        .unwrap_or(NodeType::ComponentObject)
}

/// Classes for an object node: `"<type> component_object"`
pub fn object_classes(node_type: NodeType) -> String {
    match node_type {
        NodeType::ComponentObject => NodeType::ComponentObject.as_str().to_string(),
        other => format!("{} {}", other.as_str(), NodeType::ComponentObject.as_str()),
    }
}

const OBJECT_NODE_TYPES: [&str; 5] = [
    "component_object",
    "organ",
    "cell",
    "protein",
    "cellular_component",
];

// ============================================================================
// Graph Projection
// ============================================================================

impl Association for ComponentAssociation {
    fn to_graph_elements(&self) -> Vec<GraphElement> {
        if self.process.is_empty() {
            return Vec::new();
        }

        let ke_short = self.ke_short_id();
        let process_node_id = self.process_node_id();
        let mut elements: Vec<GraphElement> = Vec::with_capacity(4);

        elements.push(
            GraphNode::new(
                &process_node_id,
                &self.process_name,
                NodeType::ComponentProcess.as_str(),
            )
            .with_classes(NodeType::ComponentProcess.as_str())
            .with_property("process_iri", self.process.as_str())
            .with_property("process_name", self.process_name.as_str())
            .with_property("process_id", self.process_id())
            .into(),
        );

        let mut process_edge = GraphEdge::new(
            format!("{}_{}", ke_short, process_node_id),
            &self.ke_uri,
            &process_node_id,
            self.edge_label(),
            EdgeType::HasProcess.as_str(),
        );
        if !self.action.is_empty() {
            process_edge = process_edge.with_property("action", self.action.as_str());
        }
        if !self.object.is_empty() {
            process_edge = process_edge.with_property("object", self.object.as_str());
        }
        elements.push(process_edge.into());

        if !self.object.is_empty() {
            let object_node_id = self.object_node_id();
            let object_type = self.object_node_type();

            let mut object_node = GraphNode::new(&object_node_id, &self.object_name, object_type.as_str())
                .with_classes(object_classes(object_type))
                .with_property("object_iri", self.object.as_str())
                .with_property("object_name", self.object_name.as_str())
                .with_property("object_id", self.object_id());
            if !self.object_type.is_empty() {
                object_node = object_node.with_property("object_type", self.object_type.as_str());
            }
            elements.push(object_node.into());

            elements.push(
                GraphEdge::new(
                    format!("{}_{}", ke_short, object_node_id),
                    &self.ke_uri,
                    &object_node_id,
                    EdgeType::Involves.as_str(),
                    EdgeType::Involves.as_str(),
                )
                .into(),
            );
        }

        elements
    }

    fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        let process_types = [NodeType::ComponentProcess.as_str()];
        let involves = [EdgeType::Involves.as_str()];
        let has_process = [EdgeType::HasProcess.as_str()];

        // Object nodes carry their IRI; organ nodes from other sources do not
        let object_nodes: HashMap<&str, &GraphNode> = index
            .nodes_of_type(&OBJECT_NODE_TYPES)
            .filter(|node| node.property_str("object_iri").is_some())
            .map(|node| (node.id.as_str(), node))
            .collect();
        let objects_by_iri: HashMap<&str, &GraphNode> = object_nodes
            .values()
            .filter_map(|node| node.property_str("object_iri").map(|iri| (iri, *node)))
            .collect();

        let mut ke_to_object: HashMap<&str, &GraphNode> = HashMap::new();
        for edge in index.edges_of_type(&involves) {
            if !is_ke_uri(&edge.source) {
                continue;
            }
            if let Some(node) = object_nodes.get(edge.target.as_str()) {
                ke_to_object.entry(edge.source.as_str()).or_insert(*node);
            }
        }

        let mut associations = Vec::new();
        for edge in index.edges_of_type(&has_process) {
            if !is_ke_uri(&edge.source) {
                continue;
            }
            let Some(process_node) = index.node_of_type(&edge.target, &process_types) else {
                continue;
            };

            let object_node = match edge.property_str("object") {
                Some(iri) => objects_by_iri.get(iri).copied(),
                None => ke_to_object.get(edge.source.as_str()).copied(),
            };

            let action = match edge.property_str("action") {
                Some(action) => action,
                None if is_component_action(&edge.label) => edge.label.as_str(),
                None => "",
            };

            let process = process_node.property_str("process_iri").unwrap_or_default();
            let mut association = match ComponentAssociation::new(edge.source.as_str(), process) {
                Ok(association) => association
                    .with_ke_name(index.node(&edge.source).map(|node| node.label.as_str()).unwrap_or_default())
                    .with_process_name(process_node.property_str("process_name").unwrap_or(&process_node.label))
                    .with_action(action),
                Err(error) => {
                    debug!(edge = %edge.id, error = %error, "Dropping component edge");
                    continue;
                },
            };

            if let Some(object) = object_node {
                association = association.with_object(
                    object.property_str("object_iri").unwrap_or_default(),
                    object.property_str("object_name").unwrap_or(&object.label),
                    object.property_str("object_type").unwrap_or(&object.node_type),
                );
            }

            associations.push(association);
        }

        associations
    }
}
