//! Generic property graph elements
//!
//! Typed associations and key events project themselves to [`GraphNode`] and
//! [`GraphEdge`] values. Those are collected in a per-network
//! [`ElementStore`] (deduplicated by id and node label) and serialized as
//! Cytoscape [`ExchangeFormat`] documents.

pub mod elements;
pub mod exchange;
pub mod store;

pub use elements::{GraphEdge, GraphElement, GraphNode};
pub use exchange::{ElementIndex, ElementRecord, ExchangeFormat, LayoutConfig, StyleRule};
pub use store::{EdgeHandle, ElementStore, NodeHandle};
