//! Static Cytoscape style sheet and layout attached to exported networks

use crate::constants::{ComponentAction, EdgeType, NodeType};
use crate::graph::{LayoutConfig, StyleRule};
use serde_json::{json, Map, Value};

/// Layout used when a network is exported with styles
pub const DEFAULT_LAYOUT: &str = "breadthfirst";

fn rule(selector: impl Into<String>, style: Value) -> StyleRule {
    StyleRule {
        selector: selector.into(),
        style: match style {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

fn node_type(node_type: NodeType) -> String {
    format!("node[type='{}']", node_type.as_str())
}

fn edge_type(edge_type: EdgeType) -> String {
    format!("edge[type='{}']", edge_type.as_str())
}

/// Selector matching every component action edge label
fn action_edges() -> String {
    ComponentAction::ALL
        .iter()
        .map(|action| format!("edge[label='{}']", action.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Style sheet for AOP networks, most generic selectors first
pub fn default_style() -> Vec<StyleRule> {
    vec![
        rule(
            "node",
            json!({
                "width": "350px",
                "height": "350px",
                "background-color": "#ffff99",
                "label": "data(label)",
                "text-wrap": "wrap",
                "text-max-width": "235px",
                "text-valign": "center",
                "text-halign": "center",
                "color": "#000",
                "font-size": "40px",
                "border-width": "2px",
                "border-color": "#000"
            }),
        ),
        rule(node_type(NodeType::Mie), json!({"background-color": "#ccffcc"})),
        rule(node_type(NodeType::Ao), json!({"background-color": "#ffe6e6"})),
        rule(
            format!("{}, .gene-node", node_type(NodeType::Gene)),
            json!({
                "shape": "ellipse",
                "width": "200px",
                "height": "100px",
                "background-opacity": 0,
                "font-size": "45px",
                "font-weight": "bold",
                "border-width": 0
            }),
        ),
        rule(
            format!("{}, .protein-node", node_type(NodeType::Protein)),
            json!({
                "shape": "round-rectangle",
                "width": "400px",
                "height": "200px",
                "background-color": "#e3f2fd",
                "color": "#0d47a1",
                "font-size": "36px",
                "border-color": "#1976d2"
            }),
        ),
        rule(
            format!("{}, .chemical-node", node_type(NodeType::Chemical)),
            json!({
                "shape": "triangle",
                "width": "270px",
                "height": "200px",
                "background-color": "#93d5f6",
                "text-valign": "top",
                "text-max-width": "190px",
                "font-size": "90px"
            }),
        ),
        rule(
            format!("{}, edge[ker_label]", edge_type(EdgeType::Ker)),
            json!({
                "curve-style": "unbundled-bezier",
                "width": "40px",
                "line-color": "#93d5f6",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#93d5f6",
                "label": "data(ker_label)",
                "text-rotation": "autorotate",
                "font-size": "40px",
                "font-weight": "bold"
            }),
        ),
        rule(
            "edge[label]",
            json!({
                "label": "data(label)",
                "text-rotation": "autorotate",
                "text-margin-y": -15,
                "font-size": "40px",
                "curve-style": "unbundled-bezier"
            }),
        ),
        rule(
            edge_type(EdgeType::Interaction),
            json!({
                "width": "40px",
                "line-color": "#ceafc0",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#ceafc0"
            }),
        ),
        rule(
            format!("{}, .process-node", node_type(NodeType::ComponentProcess)),
            json!({
                "shape": "roundrectangle",
                "width": "320px",
                "height": "140px",
                "background-color": "#ffffff",
                "border-width": "1px",
                "color": "#2196f3",
                "font-size": "32px",
                "text-max-width": "300px"
            }),
        ),
        rule(
            format!("{}, .component_object", node_type(NodeType::ComponentObject)),
            json!({
                "shape": "roundrectangle",
                "width": "280px",
                "height": "280px",
                "background-color": "#f3e5f5",
                "border-color": "#9c27b0",
                "color": "#4a148c",
                "font-size": "36px",
                "font-weight": "bold"
            }),
        ),
        rule(
            edge_type(EdgeType::HasProcess),
            json!({
                "curve-style": "bezier",
                "width": "20px",
                "line-color": "#4caf50",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#4caf50",
                "arrow-scale": 1.5,
                "font-size": "30px",
                "color": "#2e7d32"
            }),
        ),
        rule(
            edge_type(EdgeType::HasObject),
            json!({
                "curve-style": "bezier",
                "width": "20px",
                "line-color": "#9c27b0",
                "target-arrow-shape": "triangle",
                "line-style": "dashed",
                "font-size": "26px"
            }),
        ),
        rule(
            action_edges(),
            json!({
                "curve-style": "bezier",
                "width": "20px",
                "line-color": "#4caf50",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#4caf50",
                "arrow-scale": 1.8,
                "font-size": "28px",
                "font-weight": "bold",
                "color": "#1b5e20",
                "text-background-color": "#e8f5e8",
                "text-background-opacity": 1
            }),
        ),
        rule(
            format!("{}, .organ-node", node_type(NodeType::Organ)),
            json!({
                "shape": "round-rectangle",
                "width": "150px",
                "height": "150px",
                "background-color": "#8e7cc3",
                "border-color": "#6a5acd",
                "font-size": "40px",
                "color": "#ffffff",
                "text-outline-color": "#6a5acd",
                "text-outline-width": 1
            }),
        ),
        rule(
            format!("{}, .cell", node_type(NodeType::Cell)),
            json!({
                "shape": "octagon",
                "width": "180px",
                "height": "180px",
                "background-color": "#9b59b6",
                "border-color": "#7d3c98",
                "color": "#ffffff"
            }),
        ),
        rule(
            format!("{}, .cellular_component", node_type(NodeType::CellularComponent)),
            json!({
                "shape": "round-rectangle",
                "background-color": "#d5f5e3",
                "border-color": "#27ae60"
            }),
        ),
        rule(
            format!("{}, {}", edge_type(EdgeType::Involves), edge_type(EdgeType::ExpressionIn)),
            json!({
                "curve-style": "bezier",
                "width": "15px",
                "line-color": "#8e7cc3",
                "line-style": "dashed",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#8e7cc3"
            }),
        ),
        rule(
            edge_type(EdgeType::IsStressorOf),
            json!({
                "width": "30px",
                "line-color": "#93d5f6",
                "target-arrow-shape": "triangle",
                "target-arrow-color": "#93d5f6"
            }),
        ),
        rule(
            "node:selected",
            json!({
                "border-width": "6px",
                "border-color": "#ff5722"
            }),
        ),
    ]
}

/// Directed breadth-first layout
pub fn default_layout() -> LayoutConfig {
    let mut options = Map::new();
    options.insert("directed".to_string(), Value::Bool(true));
    options.insert("padding".to_string(), json!(30));

    LayoutConfig {
        name: DEFAULT_LAYOUT.to_string(),
        options,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_style_covers_key_event_types() {
        let style = default_style();
        let selectors: Vec<&str> = style.iter().map(|r| r.selector.as_str()).collect();

        assert_eq!(selectors[0], "node");
        assert!(selectors.contains(&"node[type='mie']"));
        assert!(selectors.contains(&"node[type='ao']"));
        assert!(style.iter().all(|r| !r.style.is_empty()));
    }

    #[test]
    fn test_action_selector_lists_every_action() {
        let selector = action_edges();
        assert_eq!(selector.matches("edge[label=").count(), ComponentAction::ALL.len());
        assert!(selector.contains("edge[label='arrested']"));
    }

    #[test]
    fn test_layout_serialization() {
        let value = serde_json::to_value(default_layout()).unwrap();
        assert_eq!(value["name"], "breadthfirst");
        assert_eq!(value["directed"], true);
        assert_eq!(value["padding"], 30);
    }
}
