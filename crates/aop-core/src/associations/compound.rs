// Chemical stressors of AOPs

use super::Association;
use crate::constants::{id_from_uri, is_ke_uri, EdgeType, NodeType};
use crate::error::{require, ValidationError};
use crate::graph::{ElementIndex, GraphEdge, GraphElement, GraphNode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// A chemical acting as stressor of an AOP, optionally through its MIE
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompoundAssociation {
    aop_uri: String,
    mie_uri: String,
    chemical_uri: String,
    chemical_label: String,
    pubchem_compound: String,
    compound_name: String,
    cas_id: Option<String>,
}

impl CompoundAssociation {
    pub fn new(
        aop_uri: impl Into<String>,
        chemical_uri: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let aop_uri = aop_uri.into();
        let chemical_uri = chemical_uri.into();
        require(&aop_uri, "CompoundAssociation", "aop_uri")?;
        require(&chemical_uri, "CompoundAssociation", "chemical_uri")?;

        Ok(Self {
            aop_uri,
            mie_uri: String::new(),
            chemical_uri,
            chemical_label: String::new(),
            pubchem_compound: String::new(),
            compound_name: String::new(),
            cas_id: None,
        })
    }

    pub fn with_mie(mut self, mie_uri: impl Into<String>) -> Self {
        self.mie_uri = mie_uri.into();
        self
    }

    pub fn with_chemical_label(mut self, label: impl Into<String>) -> Self {
        self.chemical_label = label.into();
        self
    }

    pub fn with_pubchem_compound(mut self, pubchem_compound: impl Into<String>) -> Self {
        self.pubchem_compound = pubchem_compound.into();
        self
    }

    pub fn with_compound_name(mut self, name: impl Into<String>) -> Self {
        self.compound_name = name.into();
        self
    }

    /// An empty CAS id counts as absent
    pub fn with_cas_id(mut self, cas_id: Option<String>) -> Self {
        self.cas_id = cas_id.filter(|c| !c.is_empty());
        self
    }

    pub fn aop_uri(&self) -> &str {
        &self.aop_uri
    }

    pub fn mie_uri(&self) -> &str {
        &self.mie_uri
    }

    pub fn chemical_uri(&self) -> &str {
        &self.chemical_uri
    }

    pub fn chemical_label(&self) -> &str {
        &self.chemical_label
    }

    pub fn pubchem_compound(&self) -> &str {
        &self.pubchem_compound
    }

    pub fn compound_name(&self) -> &str {
        &self.compound_name
    }

    pub fn cas_id(&self) -> Option<&str> {
        self.cas_id.as_deref()
    }

    pub fn pubchem_id(&self) -> &str {
        id_from_uri(&self.pubchem_compound)
    }

    pub fn chemical_node_id(&self) -> String {
        format!("chemical_{}", self.pubchem_id())
    }

    /// Compound name, falling back to the chemical label
    pub fn display_name(&self) -> &str {
        if self.compound_name.is_empty() {
            &self.chemical_label
        } else {
            &self.compound_name
        }
    }

    fn from_chemical_node(node: &GraphNode, aop_uri: &str, mie_uri: &str) -> Option<Self> {
        let built = Self::new(aop_uri, node.property_str("chemical_uri").unwrap_or_default());
        match built {
            Ok(assoc) => Some(
                assoc
                    .with_mie(mie_uri)
                    .with_chemical_label(raw_str(node, "chemical_label"))
                    .with_pubchem_compound(node.property_str("pubchem_compound").unwrap_or_default())
                    .with_compound_name(raw_str(node, "compound_name"))
                    .with_cas_id(node.property_str("cas_id").map(str::to_string)),
            ),
            Err(e) => {
                debug!(node = %node.id, error = %e, "Skipping chemical node");
                None
            },
        }
    }
}

/// A name property as written, falling back to the node label only when absent
fn raw_str<'a>(node: &'a GraphNode, key: &str) -> &'a str {
    node.property(key)
        .and_then(Value::as_str)
        .unwrap_or(&node.label)
}

impl Association for CompoundAssociation {
    fn to_graph_elements(&self) -> Vec<GraphElement> {
        let chemical_node_id = self.chemical_node_id();

        let mut node = GraphNode::new(&chemical_node_id, self.display_name(), NodeType::Chemical.as_str())
            .with_classes("chemical-node")
            .with_property("pubchem_id", self.pubchem_id())
            .with_property("chemical_label", self.chemical_label.as_str())
            .with_property("compound_name", self.compound_name.as_str())
            .with_property("pubchem_compound", self.pubchem_compound.as_str())
            .with_property("aop_uri", self.aop_uri.as_str())
            .with_property("chemical_uri", self.chemical_uri.as_str());
        if let Some(cas_id) = &self.cas_id {
            node = node.with_property("cas_id", cas_id.as_str());
        }

        let mut elements: Vec<GraphElement> = vec![node.into()];
        if !self.mie_uri.is_empty() {
            elements.push(
                GraphEdge::new(
                    format!("{}_{}", chemical_node_id, self.mie_uri),
                    &chemical_node_id,
                    &self.mie_uri,
                    EdgeType::IsStressorOf.as_str(),
                    EdgeType::IsStressorOf.as_str(),
                )
                .with_property("aop_uri", self.aop_uri.as_str())
                .into(),
            );
        }
        elements
    }

    /// One association per stressor edge; a chemical node without any
    /// stressor edge yields a single association with no MIE
    fn from_graph_elements(index: &ElementIndex) -> Vec<Self> {
        let chemical = [NodeType::Chemical.as_str()];
        let mut associations = Vec::new();
        let mut linked: HashSet<&str> = HashSet::new();

        for edge in index.edges_of_type(&[EdgeType::IsStressorOf.as_str()]) {
            let Some(node) = index.node_of_type(&edge.source, &chemical) else {
                continue;
            };
            if !is_ke_uri(&edge.target) {
                continue;
            }
            linked.insert(node.id.as_str());

            let aop_uri = edge
                .property_str("aop_uri")
                .or_else(|| node.property_str("aop_uri"));
            if let Some(aop_uri) = aop_uri {
                associations.extend(Self::from_chemical_node(node, aop_uri, &edge.target));
            }
        }

        for node in index.nodes_of_type(&chemical) {
            if linked.contains(node.id.as_str()) {
                continue;
            }
            if let Some(aop_uri) = node.property_str("aop_uri") {
                associations.extend(Self::from_chemical_node(node, aop_uri, ""));
            }
        }

        associations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const AOP: &str = "https://identifiers.org/aop/3";
    const MIE: &str = "https://identifiers.org/aop.events/201";

    fn bpa() -> CompoundAssociation {
        CompoundAssociation::new(AOP, "https://identifiers.org/aop.stressor/17")
            .unwrap()
            .with_mie(MIE)
            .with_chemical_label("Bisphenol A")
            .with_compound_name("Bisphenol A")
            .with_pubchem_compound("https://identifiers.org/pubchem.compound/6623")
            .with_cas_id(Some("80-05-7".to_string()))
    }

    #[test]
    fn test_requires_aop_and_chemical() {
        assert!(CompoundAssociation::new("", "c").is_err());
        assert!(CompoundAssociation::new(AOP, "").is_err());
    }

    #[test]
    fn test_elements() {
        let elements = bpa().to_graph_elements();
        assert_eq!(elements.len(), 2);

        let node = elements[0].as_node().unwrap();
        assert_eq!(node.id, "chemical_6623");
        assert_eq!(node.label, "Bisphenol A");
        assert_eq!(node.property_str("aop_uri"), Some(AOP));
        assert_eq!(node.property_str("cas_id"), Some("80-05-7"));

        let edge = elements[1].as_edge().unwrap();
        assert_eq!(edge.id, format!("chemical_6623_{}", MIE));
        assert_eq!(edge.label, "is stressor of");
    }

    #[test]
    fn test_no_mie_means_no_edge() {
        let assoc = CompoundAssociation::new(AOP, "chem").unwrap().with_compound_name("X");
        assert_eq!(assoc.to_graph_elements().len(), 1);
    }

    #[test]
    fn test_label_falls_back_to_chemical_label() {
        let assoc = CompoundAssociation::new(AOP, "chem").unwrap().with_chemical_label("Label");
        assert_eq!(assoc.display_name(), "Label");
    }

    #[test]
    fn test_reconstruction() {
        let with_mie = bpa();
        let without_mie = CompoundAssociation::new(AOP, "https://identifiers.org/aop.stressor/9")
            .unwrap()
            .with_compound_name("Ethanol")
            .with_chemical_label("Ethanol")
            .with_pubchem_compound("https://identifiers.org/pubchem.compound/702");

        let mut elements = with_mie.to_graph_elements();
        elements.extend(without_mie.to_graph_elements());
        let index = ElementIndex::from_elements(&elements);

        let mut restored = CompoundAssociation::from_graph_elements(&index);
        restored.sort_by(|a, b| a.compound_name.cmp(&b.compound_name));
        assert_eq!(restored, vec![with_mie, without_mie]);
    }

    #[test]
    fn test_shared_chemical_keeps_each_aop() {
        let first = bpa();
        let second = CompoundAssociation::new("https://identifiers.org/aop/9", first.chemical_uri())
            .unwrap()
            .with_mie(MIE)
            .with_compound_name("Bisphenol A")
            .with_chemical_label("Bisphenol A")
            .with_pubchem_compound(first.pubchem_compound())
            .with_cas_id(Some("80-05-7".to_string()));

        let mut elements = first.to_graph_elements();
        elements.extend(second.to_graph_elements());
        let index = ElementIndex::from_elements(&elements);

        let restored = CompoundAssociation::from_graph_elements(&index);
        let aops: HashSet<&str> = restored.iter().map(|a| a.aop_uri()).collect();
        assert_eq!(restored.len(), 2);
        assert!(aops.contains(AOP));
        assert!(aops.contains("https://identifiers.org/aop/9"));
    }
}
