// Gene and protein associations with key events

use super::Association;
use crate::constants::{is_ke_uri, EdgeType, NodeType};
use crate::error::{require, ValidationError};
use crate::graph::{ElementIndex, GraphEdge, GraphElement, GraphNode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A gene (optionally via its protein) that is part of a key event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneAssociation {
    ke_uri: String,
    gene_id: String,
    protein_id: Option<String>,
}

impl GeneAssociation {
    /// A protein id that is empty or `NA` counts as absent
    pub fn new(
        ke_uri: impl Into<String>,
        gene_id: impl Into<String>,
        protein_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let ke_uri = ke_uri.into();
        let gene_id = gene_id.into();
        require(&ke_uri, "GeneAssociation", "ke_uri")?;
        require(&gene_id, "GeneAssociation", "gene_id")?;

        Ok(Self {
            ke_uri,
            gene_id,
            protein_id: protein_id.filter(|p| !p.is_empty() && p != "NA"),
        })
    }

    pub fn ke_uri(&self) -> &str {
        &self.ke_uri
    }

    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    pub fn protein_id(&self) -> Option<&str> {
        self.protein_id.as_deref()
    }

    pub fn gene_node_id(&self) -> String {
        format!("gene_{}", self.gene_id)
    }

    pub fn protein_node_id(&self) -> Option<String> {
        self.protein_id.as_ref().map(|p| format!("protein_{}", p))
    }
}

fn gene_id_of(node: &GraphNode) -> &str {
    node.property_str("gene_id").unwrap_or(&node.label)
}

fn protein_id_of(node: &GraphNode) -> &str {
    node.property_str("protein_id").unwrap_or(&node.label)
}

impl Association for GeneAssociation {
    fn to_graph_elements(&self) -> Vec<GraphElement> {
        let gene_node_id = self.gene_node_id();
        let mut elements: Vec<GraphElement> = vec![GraphNode::new(
            &gene_node_id,
            &self.gene_id,
            NodeType::Gene.as_str(),
        )
        .with_classes("gene-node")
        .with_property("gene_id", self.gene_id.as_str())
        .into()];

        match (&self.protein_id, self.protein_node_id()) {
            (Some(protein_id), Some(protein_node_id)) => {
                elements.push(
                    GraphNode::new(&protein_node_id, protein_id, NodeType::Protein.as_str())
                        .with_classes("protein-node")
                        .with_property("protein_id", protein_id.as_str())
                        .into(),
                );
                elements.push(
                    GraphEdge::new(
                        format!("{}_{}", gene_node_id, protein_node_id),
                        &gene_node_id,
                        &protein_node_id,
                        "translates to",
                        EdgeType::TranslatesTo.as_str(),
                    )
                    .into(),
                );
                elements.push(
                    GraphEdge::new(
                        format!("{}_{}", protein_node_id, self.ke_uri),
                        &protein_node_id,
                        &self.ke_uri,
                        "part of",
                        EdgeType::PartOf.as_str(),
                    )
                    .into(),
                );
            },
            _ => {
                elements.push(
                    GraphEdge::new(
                        format!("{}_{}", gene_node_id, self.ke_uri),
                        &gene_node_id,
                        &self.ke_uri,
                        "part of",
                        EdgeType::PartOf.as_str(),
                    )
                    .into(),
                );
            },
        }

        elements
    }

    fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        let gene = [NodeType::Gene.as_str()];
        let protein = [NodeType::Protein.as_str()];

        // protein id -> gene id, first translation seen wins
        let mut protein_to_gene: HashMap<&str, &str> = HashMap::new();
        for edge in index.edges_of_type(&[EdgeType::TranslatesTo.as_str()]) {
            if let (Some(gene_node), Some(protein_node)) = (
                index.node_of_type(&edge.source, &gene),
                index.node_of_type(&edge.target, &protein),
            ) {
                protein_to_gene
                    .entry(protein_id_of(protein_node))
                    .or_insert(gene_id_of(gene_node));
            }
        }

        let mut associations = Vec::new();
        for edge in index.edges_of_type(&[EdgeType::PartOf.as_str()]) {
            if !is_ke_uri(&edge.target) {
                continue;
            }

            let resolved = if let Some(gene_node) = index.node_of_type(&edge.source, &gene) {
                Self::new(edge.target.as_str(), gene_id_of(gene_node), None)
            } else if let Some(protein_node) = index.node_of_type(&edge.source, &protein) {
                let protein_id = protein_id_of(protein_node);
                match protein_to_gene.get(protein_id) {
                    Some(gene_id) => {
                        Self::new(edge.target.as_str(), *gene_id, Some(protein_id.to_string()))
                    },
                    None => {
                        debug!(protein = %protein_id, "Protein has no translating gene");
                        continue;
                    },
                }
            } else {
                continue;
            };

            match resolved {
                Ok(association) => associations.push(association),
                Err(e) => debug!(edge = %edge.id, error = %e, "Skipping gene edge"),
            }
        }

        associations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const KE: &str = "https://identifiers.org/aop.events/888";

    #[test]
    fn test_gene_without_protein_yields_node_and_direct_edge() {
        let assoc = GeneAssociation::new(KE, "BRCA1", None).unwrap();
        let elements = assoc.to_graph_elements();

        assert_eq!(elements.len(), 2);
        let node = elements[0].as_node().unwrap();
        assert_eq!(node.id, "gene_BRCA1");
        assert_eq!(node.classes, "gene-node");

        let edge = elements[1].as_edge().unwrap();
        assert_eq!(edge.id, "gene_BRCA1_https://identifiers.org/aop.events/888");
        assert_eq!(edge.label, "part of");
        assert!(edge.is_type(EdgeType::PartOf));
    }

    #[test]
    fn test_gene_with_protein_yields_chain() {
        let assoc = GeneAssociation::new(KE, "BRCA1", Some("P38398".to_string())).unwrap();
        let elements = assoc.to_graph_elements();

        let ids: Vec<&str> = elements.iter().map(GraphElement::id).collect();
        assert_eq!(
            ids,
            vec![
                "gene_BRCA1",
                "protein_P38398",
                "gene_BRCA1_protein_P38398",
                "protein_P38398_https://identifiers.org/aop.events/888",
            ]
        );
        assert_eq!(elements[2].as_edge().unwrap().label, "translates to");
    }

    #[test]
    fn test_na_protein_is_absent() {
        let assoc = GeneAssociation::new(KE, "BRCA1", Some("NA".to_string())).unwrap();
        assert_eq!(assoc.protein_id(), None);
        assert_eq!(assoc.to_graph_elements().len(), 2);
    }

    #[test]
    fn test_requires_ke_and_gene() {
        assert!(GeneAssociation::new("", "BRCA1", None).is_err());
        assert!(GeneAssociation::new(KE, "", None).is_err());
    }

    #[test]
    fn test_reconstruction_direct_and_transitive() {
        let direct = GeneAssociation::new(KE, "TP53", None).unwrap();
        let via_protein = GeneAssociation::new(KE, "BRCA1", Some("P38398".to_string())).unwrap();
        let mut elements = direct.to_graph_elements();
        elements.extend(via_protein.to_graph_elements());
        // reversed order must not matter
        elements.reverse();

        let index = ElementIndex::from_elements(&elements);
        let mut restored = GeneAssociation::from_graph_elements(&index);
        restored.sort_by(|a, b| a.gene_id.cmp(&b.gene_id));

        assert_eq!(restored, vec![via_protein, direct]);
    }

    #[test]
    fn test_orphan_protein_yields_nothing() {
        let elements: Vec<GraphElement> = vec![
            GraphNode::new("protein_P1", "P1", "protein").into(),
            GraphEdge::new("protein_P1_ke", "protein_P1", KE, "part of", "part_of").into(),
        ];
        let index = ElementIndex::from_elements(&elements);
        assert!(GeneAssociation::from_graph_elements(&index).is_empty());
    }

    #[test]
    fn test_part_of_edge_to_non_event_is_ignored() {
        let elements: Vec<GraphElement> = vec![
            GraphNode::new("gene_A", "A", "gene").into(),
            GraphEdge::new("e", "gene_A", "organ_1", "part of", "part_of").into(),
        ];
        let index = ElementIndex::from_elements(&elements);
        assert!(GeneAssociation::from_graph_elements(&index).is_empty());
    }
}
