//! Associations between key events and biological entities
//!
//! Every variant projects itself to graph elements and can be rebuilt from
//! an [`ElementIndex`] of a whole exchange document. Reconstruction only looks
//! at elements carrying the variant's type markers; anything else in the
//! document is ignored, and an element whose counterpart is missing (an
//! orphan protein, an edge to an unknown node) yields nothing.

use crate::graph::{ElementIndex, GraphElement};

mod component;
mod compound;
mod expression;
mod gene;
mod organ;

pub use component::{classify_object, object_classes, ComponentAssociation};
pub use compound::CompoundAssociation;
pub use expression::GeneExpressionAssociation;
pub use gene::GeneAssociation;
pub use organ::OrganAssociation;

pub trait Association: Sized {
    /// Project to graph elements; pure and deterministic
    fn to_graph_elements(&self) -> Vec<GraphElement>;

    /// Every instance derivable from the indexed elements
    fn from_graph_elements(index: &ElementIndex) -> Vec<Self>;
}
