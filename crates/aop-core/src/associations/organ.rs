// Organs involved in key events

use super::Association;
use crate::constants::{id_from_uri, is_ke_uri, EdgeType, NodeType};
use crate::error::{require, ValidationError};
use crate::graph::{ElementIndex, GraphEdge, GraphElement, GraphNode};
use serde::Serialize;

/// A key event taking place in an organ, held as its ready-made elements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganAssociation {
    ke_uri: String,
    organ_node: GraphNode,
    edge: GraphEdge,
}

impl OrganAssociation {
    pub fn new(ke_uri: impl Into<String>, organ_node: GraphNode, edge: GraphEdge) -> Result<Self, ValidationError> {
        let ke_uri = ke_uri.into();
        require(&ke_uri, "OrganAssociation", "ke_uri")?;
        require(&organ_node.id, "OrganAssociation", "organ_node")?;

        Ok(Self {
            ke_uri,
            organ_node,
            edge,
        })
    }

    /// Build the organ node and the `involves` edge for a key event
    ///
    /// An empty organ name falls back to the last segment of the organ URI.
    pub fn for_key_event(
        ke_uri: impl Into<String>,
        organ_uri: impl Into<String>,
        organ_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let ke_uri = ke_uri.into();
        let organ_uri = organ_uri.into();
        let organ_name = organ_name.into();
        require(&ke_uri, "OrganAssociation", "ke_uri")?;
        require(&organ_uri, "OrganAssociation", "organ_uri")?;

        let label = if organ_name.is_empty() {
            id_from_uri(&organ_uri).to_string()
        } else {
            organ_name.clone()
        };
        let organ_node = GraphNode::new(&organ_uri, label, NodeType::Organ.as_str())
            .with_classes("organ-node")
            .with_property("anatomical_id", organ_uri.as_str())
            .with_property("anatomical_name", organ_name);
        let edge = GraphEdge::new(
            format!("{}_{}", ke_uri, organ_uri),
            &ke_uri,
            &organ_uri,
            EdgeType::Involves.as_str(),
            EdgeType::Involves.as_str(),
        );

        Ok(Self {
            ke_uri,
            organ_node,
            edge,
        })
    }

    pub fn ke_uri(&self) -> &str {
        &self.ke_uri
    }

    pub fn organ_node(&self) -> &GraphNode {
        &self.organ_node
    }

    pub fn edge(&self) -> &GraphEdge {
        &self.edge
    }

    pub fn organ_id(&self) -> &str {
        &self.organ_node.id
    }

    /// Anatomical name, falling back to the node label
    pub fn organ_name(&self) -> &str {
        self.organ_node
            .property_str("anatomical_name")
            .unwrap_or(&self.organ_node.label)
    }
}

impl Association for OrganAssociation {
    fn to_graph_elements(&self) -> Vec<GraphElement> {
        vec![self.organ_node.clone().into(), self.edge.clone().into()]
    }

    /// Organ nodes reached from a key event by an `involves` edge; component
    /// objects share the edge type but carry `object_iri` and are left out
    fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        let organ = [NodeType::Organ.as_str()];

        index
            .edges_of_type(&[EdgeType::Involves.as_str()])
            .filter(|edge| is_ke_uri(&edge.source))
            .filter_map(|edge| {
                let organ_node = index
                    .node_of_type(&edge.target, &organ)
                    .filter(|node| node.property("object_iri").is_none())?;
                Self::new(edge.source.as_str(), organ_node.clone(), edge.clone()).ok()
            })
            .collect()
    }
}
