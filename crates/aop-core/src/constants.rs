// Type markers and identifier conventions shared by the model and the exchange format

use serde::{Deserialize, Serialize};

/// Prefix shared by every key event URI
pub const KE_URI_PREFIX: &str = "https://identifiers.org/aop.events/";

/// Prefix of key event relationship URIs
pub const KER_URI_PREFIX: &str = "https://identifiers.org/aop.relationships/";

/// Namespace of the `curie` carried by relationship edges
pub const KER_CURIE_NAMESPACE: &str = "aop.relationships";

/// Prefix of AOP URIs
pub const AOP_URI_PREFIX: &str = "https://identifiers.org/aop/";

/// Short prefix used when a key event URI is embedded in an element id
pub const KE_SHORT_PREFIX: &str = "aop.events_";

/// Object type IRI marking an organ context in AOP-Wiki RDF
pub const ORGAN_CONTEXT_IRI: &str = "http://aopkb.org/aop_ontology#OrganContext";

/// Placeholder written into table cells with no value
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder title for key events returned without one
pub const MISSING_TITLE: &str = "NA";

/// True when `uri` names a key event
pub fn is_ke_uri(uri: &str) -> bool {
    uri.starts_with(KE_URI_PREFIX)
}

/// Substring after the final `/`, or the whole input when there is none
///
/// Example: "https://identifiers.org/aop.events/888" -> "888"
pub fn id_from_uri(uri: &str) -> &str {
    match uri.rfind('/') {
        Some(pos) => &uri[pos + 1..],
        None => uri,
    }
}

/// Build the `aop.relationships:<id>` curie for a relationship id
pub fn ker_curie(ker_id: &str) -> String {
    format!("{}:{}", KER_CURIE_NAMESPACE, ker_id)
}

/// Build the relationship URI for a relationship id
pub fn ker_uri(ker_id: &str) -> String {
    format!("{}{}", KER_URI_PREFIX, ker_id)
}

// ============================================================================
// Node Types
// ============================================================================

/// Node `type` markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Mie,
    Ke,
    Ao,
    Chemical,
    Protein,
    Gene,
    Organ,
    ComponentProcess,
    ComponentObject,
    Custom,
    Cell,
    Quality,
    CellularComponent,
}

impl NodeType {
    pub const ALL: [NodeType; 13] = [
        NodeType::Mie,
        NodeType::Ke,
        NodeType::Ao,
        NodeType::Chemical,
        NodeType::Protein,
        NodeType::Gene,
        NodeType::Organ,
        NodeType::ComponentProcess,
        NodeType::ComponentObject,
        NodeType::Custom,
        NodeType::Cell,
        NodeType::Quality,
        NodeType::CellularComponent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Mie => "mie",
            NodeType::Ke => "ke",
            NodeType::Ao => "ao",
            NodeType::Chemical => "chemical",
            NodeType::Protein => "protein",
            NodeType::Gene => "gene",
            NodeType::Organ => "organ",
            NodeType::ComponentProcess => "component_process",
            NodeType::ComponentObject => "component_object",
            NodeType::Custom => "custom",
            NodeType::Cell => "cell",
            NodeType::Quality => "quality",
            NodeType::CellularComponent => "cellular_component",
        }
    }

    /// Look up a node type by its marker string
    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == marker)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Edge Types
// ============================================================================

/// Edge `type` markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    #[serde(rename = "ker")]
    Ker,
    #[serde(rename = "interaction")]
    Interaction,
    #[serde(rename = "part_of")]
    PartOf,
    #[serde(rename = "translates_to")]
    TranslatesTo,
    #[serde(rename = "expression_in")]
    ExpressionIn,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "is stressor of")]
    IsStressorOf,
    #[serde(rename = "has process")]
    HasProcess,
    #[serde(rename = "involves")]
    Involves,
    #[serde(rename = "has object")]
    HasObject,
    #[serde(rename = "na")]
    Na,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Ker => "ker",
            EdgeType::Interaction => "interaction",
            EdgeType::PartOf => "part_of",
            EdgeType::TranslatesTo => "translates_to",
            EdgeType::ExpressionIn => "expression_in",
            EdgeType::Custom => "custom",
            EdgeType::IsStressorOf => "is stressor of",
            EdgeType::HasProcess => "has process",
            EdgeType::Involves => "involves",
            EdgeType::HasObject => "has object",
            EdgeType::Na => "na",
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Component Actions
// ============================================================================

/// Action terms that label a key event to process edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentAction {
    Increased,
    Decreased,
    Delayed,
    Occurrence,
    Abnormal,
    Premature,
    Disrupted,
    FunctionalChange,
    MorphologicalChange,
    Pathological,
    Arrested,
}

impl ComponentAction {
    pub const ALL: [ComponentAction; 11] = [
        ComponentAction::Increased,
        ComponentAction::Decreased,
        ComponentAction::Delayed,
        ComponentAction::Occurrence,
        ComponentAction::Abnormal,
        ComponentAction::Premature,
        ComponentAction::Disrupted,
        ComponentAction::FunctionalChange,
        ComponentAction::MorphologicalChange,
        ComponentAction::Pathological,
        ComponentAction::Arrested,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComponentAction::Increased => "increased process quality",
            ComponentAction::Decreased => "decreased process quality",
            ComponentAction::Delayed => "delayed",
            ComponentAction::Occurrence => "occurrence",
            ComponentAction::Abnormal => "abnormal",
            ComponentAction::Premature => "premature",
            ComponentAction::Disrupted => "disrupted",
            ComponentAction::FunctionalChange => "functional change",
            ComponentAction::MorphologicalChange => "morphological change",
            ComponentAction::Pathological => "pathological",
            ComponentAction::Arrested => "arrested",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

/// True when `label` is one of the recognized action terms
pub fn is_component_action(label: &str) -> bool {
    ComponentAction::from_label(label).is_some()
}
