// Gene expression in anatomical entities (Bgee)

use super::Association;
use crate::constants::{EdgeType, NodeType};
use crate::error::{require, ValidationError};
use crate::graph::{ElementIndex, GraphEdge, GraphElement, GraphNode};
use serde::Serialize;
use tracing::debug;

/// Observed expression of a gene in an organ or tissue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneExpressionAssociation {
    gene_id: String,
    anatomical_id: String,
    anatomical_name: String,
    expression_level: String,
    confidence_id: String,
    confidence_level: String,
    developmental_id: String,
    developmental_stage: String,
    expr: String,
}

impl GeneExpressionAssociation {
    pub fn new(
        gene_id: impl Into<String>,
        anatomical_id: impl Into<String>,
        anatomical_name: impl Into<String>,
        expression_level: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let gene_id = gene_id.into();
        let anatomical_id = anatomical_id.into();
        require(&gene_id, "GeneExpressionAssociation", "gene_id")?;
        require(&anatomical_id, "GeneExpressionAssociation", "anatomical_id")?;

        Ok(Self {
            gene_id,
            anatomical_id,
            anatomical_name: anatomical_name.into(),
            expression_level: expression_level.into(),
            confidence_id: String::new(),
            confidence_level: String::new(),
            developmental_id: String::new(),
            developmental_stage: String::new(),
            expr: String::new(),
        })
    }

    pub fn with_confidence(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.confidence_id = id.into();
        self.confidence_level = name.into();
        self
    }

    pub fn with_developmental_stage(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.developmental_id = id.into();
        self.developmental_stage = name.into();
        self
    }

    pub fn with_expr(mut self, expr: impl Into<String>) -> Self {
        self.expr = expr.into();
        self
    }

    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    pub fn anatomical_id(&self) -> &str {
        &self.anatomical_id
    }

    pub fn anatomical_name(&self) -> &str {
        &self.anatomical_name
    }

    pub fn expression_level(&self) -> &str {
        &self.expression_level
    }

    pub fn confidence_id(&self) -> &str {
        &self.confidence_id
    }

    pub fn confidence_level(&self) -> &str {
        &self.confidence_level
    }

    pub fn developmental_id(&self) -> &str {
        &self.developmental_id
    }

    pub fn developmental_stage(&self) -> &str {
        &self.developmental_stage
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn gene_node_id(&self) -> String {
        format!("gene_{}", self.gene_id)
    }

    pub fn edge_id(&self) -> String {
        format!("{}_{}_expression", self.gene_node_id(), self.anatomical_id)
    }
}

fn string_prop<'a>(edge: &'a GraphEdge, key: &str) -> &'a str {
    edge.property_str(key).unwrap_or_default()
}

impl Association for GeneExpressionAssociation {
    fn to_graph_elements(&self) -> Vec<GraphElement> {
        let organ = GraphNode::new(&self.anatomical_id, &self.anatomical_name, NodeType::Organ.as_str())
            .with_classes("organ-node")
            .with_property("anatomical_id", self.anatomical_id.as_str())
            .with_property("anatomical_name", self.anatomical_name.as_str());

        let edge = GraphEdge::new(
            self.edge_id(),
            self.gene_node_id(),
            &self.anatomical_id,
            format!("expressed in ({})", self.expression_level),
            EdgeType::ExpressionIn.as_str(),
        )
        .with_property("expression_level", self.expression_level.as_str())
        .with_property("confidence_level", self.confidence_level.as_str())
        .with_property("developmental_stage", self.developmental_stage.as_str())
        .with_property("confidence_id", self.confidence_id.as_str())
        .with_property("developmental_id", self.developmental_id.as_str())
        .with_property("expr", self.expr.as_str());

        vec![organ.into(), edge.into()]
    }

    fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        let organ = [NodeType::Organ.as_str()];
        let gene = [NodeType::Gene.as_str()];
        let mut associations = Vec::new();

        for edge in index.edges_of_type(&[EdgeType::ExpressionIn.as_str()]) {
            let Some(organ_node) = index.node_of_type(&edge.target, &organ) else {
                debug!(edge = %edge.id, "Expression edge has no organ target");
                continue;
            };

            let gene_id = match index.node_of_type(&edge.source, &gene) {
                Some(node) => node.property_str("gene_id").unwrap_or(&node.label).to_string(),
                None => edge
                    .source
                    .strip_prefix("gene_")
                    .unwrap_or(&edge.source)
                    .to_string(),
            };
            let anatomical_name = organ_node
                .property_str("anatomical_name")
                .unwrap_or(&organ_node.label);

            match Self::new(gene_id, &organ_node.id, anatomical_name, string_prop(edge, "expression_level")) {
                Ok(association) => associations.push(
                    association
                        .with_confidence(string_prop(edge, "confidence_id"), string_prop(edge, "confidence_level"))
                        .with_developmental_stage(
                            string_prop(edge, "developmental_id"),
                            string_prop(edge, "developmental_stage"),
                        )
                        .with_expr(string_prop(edge, "expr")),
                ),
                Err(e) => debug!(edge = %edge.id, error = %e, "Skipping expression edge"),
            }
        }

        associations
    }
}
