//! AOP Core
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! In-memory model of an Adverse Outcome Pathway (AOP) network: key events,
//! key event relationships and the biological entities associated with them
//! (genes, proteins, chemicals, organs, component processes).
//!
//! # Overview
//!
//! - [`aop_info`]: AOP descriptors, key events and key event relationships
//! - [`associations`]: the five association variants, each projecting itself
//!   to graph elements and reconstructing itself from them
//! - [`graph`]: generic nodes and edges, the deduplicating [`ElementStore`]
//!   and the Cytoscape exchange format
//! - [`network`]: the [`AopNetwork`] aggregator
//! - [`processors`]: SPARQL result bindings to model instances
//! - [`tables`]: flat row projections with CSV/TSV output
//!
//! # Example
//!
//! ```
//! use aop_core::{AopNetwork, GeneAssociation};
//!
//! let mut network = AopNetwork::new();
//! let gene = GeneAssociation::new(
//!     "https://identifiers.org/aop.events/888",
//!     "BRCA1",
//!     None,
//! )?;
//! network.add_gene_association(gene);
//!
//! let exchange = network.to_exchange_format(true);
//! let restored = AopNetwork::from_exchange_format(&exchange.elements);
//! assert_eq!(restored.gene_associations().len(), 1);
//! # Ok::<(), aop_core::ValidationError>(())
//! ```

pub mod aop_info;
pub mod associations;
pub mod constants;
pub mod error;
pub mod graph;
pub mod network;
pub mod processors;
pub mod styles;
pub mod tables;

// Re-export commonly used types
pub use aop_info::{AopInfo, KeyEvent, KeyEventRelationship, KeyEventType};
pub use associations::{
    classify_object, Association, ComponentAssociation, CompoundAssociation, GeneAssociation,
    GeneExpressionAssociation, OrganAssociation,
};
pub use constants::{EdgeType, NodeType};
pub use error::ValidationError;
pub use graph::{
    ElementIndex, ElementRecord, ElementStore, ExchangeFormat, GraphEdge, GraphElement, GraphNode,
};
pub use network::{AopNetwork, NetworkSummary};
pub use processors::{Binding, BindingValue, ProcessedBatch, RowFailure, SparqlResults};
