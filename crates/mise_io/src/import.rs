//! Recipe import.
//!
//! The document is read as loose JSON first so that each defect gets the
//! treatment it deserves: missing ids and positions are filled in, edges
//! that point nowhere are dropped, and unknown node kinds or malformed
//! attribute bags abort the whole import.

use crate::error::ImportError;
use mise_core::{EdgeId, FormatVersion, NodeId};
use mise_plan::{Edge, EdgeData, EdgeStyle, Node, NodeData, NodeKind, Position, RecipeGraph};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Import configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportConfig {
    /// Position of the first node that has none
    pub origin: Position,
    /// Offset between consecutive fallback positions
    pub step: Position,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            origin: Position { x: 100.0, y: 100.0 },
            step: Position { x: 60.0, y: 40.0 },
        }
    }
}

impl ImportConfig {
    /// Set the fallback grid origin
    #[must_use]
    pub fn with_origin(mut self, origin: Position) -> Self {
        self.origin = origin;
        self
    }

    /// Set the fallback grid step
    #[must_use]
    pub fn with_step(mut self, step: Position) -> Self {
        self.step = step;
        self
    }

    /// Fallback position for the node at `index`
    #[must_use]
    pub fn fallback_position(&self, index: usize) -> Position {
        let i = index as f64;
        Position {
            x: self.origin.x + i * self.step.x,
            y: self.origin.y + i * self.step.y,
        }
    }
}

/// Import a recipe document with the default configuration
///
/// # Errors
///
/// Returns error if the text is not a recipe document
pub fn import_recipe(text: &str) -> Result<RecipeGraph, ImportError> {
    import_recipe_with(text, &ImportConfig::default())
}

/// Import a recipe document
///
/// # Errors
///
/// Returns error if the text is not JSON, lacks `nodes` or `edges`, has a
/// node of unknown kind or with a malformed attribute bag, or repeats a
/// node id. Edges that cannot be read are dropped.
pub fn import_recipe_with(text: &str, config: &ImportConfig) -> Result<RecipeGraph, ImportError> {
    let document = parse_document(text)?;
    let raw_nodes = required(&document, "nodes")?;
    let raw_edges = required(&document, "edges")?;

    if let Some(version) = document
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .map(FormatVersion)
    {
        if !version.is_supported() {
            warn!(
                %version,
                current = %FormatVersion::CURRENT,
                "Reading a recipe from a newer format"
            );
        }
    }

    let mut graph = RecipeGraph::new();
    for (index, raw) in as_list(raw_nodes).iter().enumerate() {
        graph.add_node(read_node(raw, index, config)?)?;
    }

    let known: HashSet<NodeId> = graph.nodes().map(|n| n.id().clone()).collect();
    for (index, raw) in as_list(raw_edges).iter().enumerate() {
        let id = id_text(raw).map_or_else(|| EdgeId::generated(index), EdgeId::new);
        let (Some(source), Some(target)) = (endpoint(raw, "source"), endpoint(raw, "target")) else {
            debug!(edge = %id, "Dropping edge with a missing endpoint");
            continue;
        };
        if source == target || !known.contains(&source) || !known.contains(&target) {
            debug!(
                edge = %id,
                %source,
                %target,
                "Dropping edge with an unknown endpoint or self-loop"
            );
            continue;
        }

        let data: EdgeData = match serde_json::from_value(bag(raw)) {
            Ok(data) => data,
            Err(err) => {
                debug!(edge = %id, error = %err, "Dropping edge with unreadable data");
                continue;
            }
        };

        let edge = Edge {
            id: id.clone(),
            source,
            target,
            data,
            style: read_style(raw),
        };
        if let Err(err) = graph.add_edge(edge) {
            debug!(edge = %id, error = %err, "Dropping edge the graph refused");
        }
    }

    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "Imported recipe");
    Ok(graph)
}

/// Strict parse, then a second try on the outermost `{...}` span
fn parse_document(text: &str) -> Result<Value, ImportError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if end > start => {
                debug!(start, end, "Recovering recipe JSON from surrounding text");
                Ok(serde_json::from_str(&text[start..=end])?)
            }
            _ => Err(err.into()),
        },
    }
}

fn required<'a>(document: &'a Value, key: &'static str) -> Result<&'a Value, ImportError> {
    document
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or(ImportError::MissingKey { key })
}

fn as_list(value: &Value) -> &[Value] {
    value.as_array().map_or(&[], Vec::as_slice)
}

/// Id as text: strings as-is, other scalars stringified
fn id_text(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn endpoint(raw: &Value, key: &str) -> Option<NodeId> {
    match raw.get(key)? {
        Value::String(s) => Some(NodeId::new(s.as_str())),
        Value::Number(n) => Some(NodeId::new(n.to_string())),
        _ => None,
    }
}

/// The `data` bag, or an empty one when absent or falsy
fn bag(raw: &Value) -> Value {
    match raw.get("data") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Value::Object(Map::new()),
        Some(data) => data.clone(),
    }
}

fn read_node(raw: &Value, index: usize, config: &ImportConfig) -> Result<Node, ImportError> {
    let id = id_text(raw).map_or_else(|| NodeId::generated(index), NodeId::new);

    let kind = match raw.get("type") {
        Some(Value::String(name)) => {
            NodeKind::parse(name).ok_or_else(|| ImportError::UnknownNodeKind {
                kind: name.clone(),
            })?
        }
        Some(other) => return Err(ImportError::UnknownNodeKind { kind: other.to_string() }),
        None => {
            return Err(ImportError::UnknownNodeKind {
                kind: "undefined".to_string(),
            })
        }
    };

    let position = raw
        .get("position")
        .and_then(|p| Some(Position {
            x: p.get("x")?.as_f64()?,
            y: p.get("y")?.as_f64()?,
        }))
        .unwrap_or_else(|| config.fallback_position(index));

    let data = NodeData::from_value(kind, bag(raw)).map_err(|e| ImportError::InvalidData {
        id: id.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Node::new(id, position, data))
}

fn read_style(raw: &Value) -> EdgeStyle {
    let mut style = EdgeStyle::default();
    if let Some(curve) = raw.get("type").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        style.curve = curve.to_string();
    }
    match raw.get("markerEnd") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {}
        Some(Value::String(s)) if s.is_empty() => {}
        Some(marker) => style.marker_end = marker.clone(),
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_recipe;
    use mise_core::{AmountView, Macros, NutritionRecord};
    use mise_plan::{IngredientData, OutputData, Servings, StepData};
    use serde_json::json;

    fn sample() -> RecipeGraph {
        let record = NutritionRecord {
            values: Some(Macros::new(182.0, 5.0, 0.5, 38.0).into()),
            per_reference: Some(AmountView::new(100.0, "g", Macros::new(364.0, 10.0, 1.0, 76.0))),
            product_name: Some("Plain Flour".into()),
            ..NutritionRecord::default()
        };
        let mut flour = IngredientData::new("Flour", "50 g").with_nutrition(record);
        flour.extra.insert("color".into(), json!("#fff"));

        let mut graph = RecipeGraph::new();
        graph
            .add_node(Node::ingredient("flour", flour).at(Position { x: 5.0, y: 7.5 }))
            .unwrap();
        graph
            .add_node(Node::step(
                "mix",
                StepData {
                    time: Some("5 min".into()),
                    ..StepData::new("Mix", "Whisk")
                },
            ))
            .unwrap();
        let dough = OutputData::new("Dough", Servings::Fraction(2.5));
        graph.add_node(Node::output("dough", dough)).unwrap();
        graph.add_edge(Edge::new("e1", "flour", "mix").with_use_amount("25 g")).unwrap();
        graph.add_edge(Edge::new("e2", "mix", "dough")).unwrap();
        graph
    }

    #[test]
    fn test_round_trip() {
        let graph = sample();
        let imported = import_recipe(&export_recipe(&graph).unwrap()).unwrap();
        assert_eq!(imported, graph);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let once = export_recipe(&sample()).unwrap();
        let twice = export_recipe(&import_recipe(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_recovers_from_surrounding_text() {
        let body = export_recipe(&sample()).unwrap();
        let wrapped = format!("Here is my recipe:\n```json\n{}\n```\nEnjoy!", body);
        assert_eq!(import_recipe(&wrapped).unwrap(), sample());
    }

    #[test]
    fn test_unrecoverable_text() {
        assert!(matches!(import_recipe("no braces at all"), Err(ImportError::Parse(_))));
        assert!(matches!(import_recipe("} backwards {"), Err(ImportError::Parse(_))));
        assert!(matches!(import_recipe("{ still not json }"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_missing_keys() {
        assert!(matches!(
            import_recipe(r#"{"edges": []}"#),
            Err(ImportError::MissingKey { key: "nodes" })
        ));
        assert!(matches!(
            import_recipe(r#"{"nodes": [], "edges": null}"#),
            Err(ImportError::MissingKey { key: "edges" })
        ));
        assert!(matches!(import_recipe("[]"), Err(ImportError::MissingKey { key: "nodes" })));
    }

    #[test]
    fn test_non_array_lists_are_empty() {
        let graph = import_recipe(r#"{"nodes": {"a": 1}, "edges": 3}"#).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_unknown_node_kind() {
        let text = json!({"nodes": [{"id": "x", "type": "garnish"}], "edges": []}).to_string();
        match import_recipe(&text) {
            Err(ImportError::UnknownNodeKind { kind }) => assert_eq!(kind, "garnish"),
            other => panic!("unexpected result: {:?}", other),
        }
        let text = json!({"nodes": [{"id": "x"}], "edges": []}).to_string();
        assert!(matches!(import_recipe(&text), Err(ImportError::UnknownNodeKind { .. })));
    }

    #[test]
    fn test_generated_ids_and_positions() {
        let text = json!({
            "nodes": [
                {"type": "ingredient", "data": {"label": "Salt"}},
                {"id": 7, "type": "step", "position": {"x": "1", "y": 2}},
                {"id": null, "type": "output", "position": {"x": 3, "y": 4}}
            ],
            "edges": []
        })
        .to_string();

        let graph = import_recipe(&text).unwrap();
        let nodes: Vec<&Node> = graph.nodes().collect();
        assert_eq!(nodes[0].id(), &NodeId::generated(0));
        assert!(nodes[0].id().as_str().starts_with("nd_"));
        assert_eq!(nodes[0].position(), Position { x: 100.0, y: 100.0 });
        assert_eq!(nodes[1].id().as_str(), "7");
        assert_eq!(nodes[1].position(), Position { x: 160.0, y: 140.0 });
        assert_eq!(nodes[2].id(), &NodeId::generated(2));
        assert_eq!(nodes[2].position(), Position { x: 3.0, y: 4.0 });

        let again = import_recipe(&text).unwrap();
        assert_eq!(graph, again);
    }

    #[test]
    fn test_custom_fallback_grid() {
        let text = json!({"nodes": [{"type": "step"}, {"type": "step"}], "edges": []}).to_string();
        let config = ImportConfig::default()
            .with_origin(Position { x: 0.0, y: 0.0 })
            .with_step(Position { x: 10.0, y: 0.0 });
        let graph = import_recipe_with(&text, &config).unwrap();
        let positions: Vec<Position> = graph.nodes().map(Node::position).collect();
        assert_eq!(positions, vec![Position { x: 0.0, y: 0.0 }, Position { x: 10.0, y: 0.0 }]);
    }

    #[test]
    fn test_edges_are_filtered_and_defaulted() {
        let text = json!({
            "nodes": [
                {"id": "a", "type": "ingredient"},
                {"id": "b", "type": "step"}
            ],
            "edges": [
                {"source": "a", "target": "b"},
                {"id": "loop", "source": "b", "target": "b"},
                {"id": "dangling", "source": "a", "target": "ghost"},
                {"id": "half", "source": "a"},
                {
                    "id": "styled",
                    "source": "a",
                    "target": "b",
                    "type": "step",
                    "markerEnd": {"type": "arrow"}
                }
            ]
        })
        .to_string();

        let graph = import_recipe(&text).unwrap();
        let edges = graph.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].id, EdgeId::generated(0));
        assert_eq!(edges[0].style, EdgeStyle::default());
        assert_eq!(edges[1].id.as_str(), "styled");
        assert_eq!(edges[1].style.curve, "step");
        assert_eq!(edges[1].style.marker_end, json!({"type": "arrow"}));
    }

    #[test]
    fn test_malformed_data_is_fatal() {
        let node = json!({"id": "a", "type": "step", "data": {"label": 5}});
        let text = json!({"nodes": [node], "edges": []}).to_string();
        match import_recipe(&text) {
            Err(ImportError::InvalidData { id, .. }) => assert_eq!(id, "a"),
            other => panic!("unexpected result: {:?}", other),
        }
        let node = json!({"id": "a", "type": "step", "data": "oops"});
        let text = json!({"nodes": [node], "edges": []}).to_string();
        assert!(matches!(import_recipe(&text), Err(ImportError::InvalidData { .. })));
    }

    #[test]
    fn test_unreadable_edges_are_dropped() {
        let text = json!({
            "nodes": [
                {"id": "a", "type": "ingredient"},
                {"id": "b", "type": "step"},
                {"id": "c", "type": "output"}
            ],
            "edges": [
                {"id": "e1", "source": "a", "target": "b", "data": {"useAmount": "1 cup"}},
                {"id": "e1", "source": "b", "target": "c"},
                {"id": "e2", "source": "a", "target": "b", "data": {"useAmount": 50}},
                {"id": "e3", "source": "b", "target": "c", "data": "oops"},
                {"id": "e4", "source": "b", "target": "c"}
            ]
        })
        .to_string();

        let graph = import_recipe(&text).unwrap();
        let ids: Vec<&str> = graph.edges().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e4"]);
        assert_eq!(graph.edges()[0].use_amount(), Some("1 cup"));
        assert_eq!(graph.edges()[0].target.as_str(), "b");
    }

    #[test]
    fn test_round_trip_keeps_nutrition_as_written() {
        let nutrition = json!({
            "values": {"calories": 190, "protein": 4, "fat": 2, "carbs": 30, "fiber": 5},
            "perReference": {"quantity": "per pack", "unit": "g", "values": {"calories": "380"}},
            "lookup": {"source": "manual", "tags": ["dry"]}
        });
        let text = json!({
            "version": 1,
            "nodes": [{
                "id": "oats",
                "type": "ingredient",
                "position": {"x": 0, "y": 0},
                "data": {"label": "Oats", "amount": "50 g", "nutrition": nutrition.clone()}
            }],
            "edges": []
        })
        .to_string();

        let graph = import_recipe(&text).unwrap();
        let exported: Value = serde_json::from_str(&export_recipe(&graph).unwrap()).unwrap();
        assert_eq!(exported["nodes"][0]["data"]["nutrition"], nutrition);
        assert_eq!(import_recipe(&exported.to_string()).unwrap(), graph);
    }

    #[test]
    fn test_duplicate_node_id_is_fatal() {
        let text = json!({
            "nodes": [{"id": "a", "type": "step"}, {"id": "a", "type": "output"}],
            "edges": []
        })
        .to_string();
        assert!(matches!(import_recipe(&text), Err(ImportError::Graph(_))));
    }

    #[test]
    fn test_lenient_nutrition_numbers() {
        let text = json!({
            "nodes": [{
                "id": "a",
                "type": "ingredient",
                "data": {
                    "label": "Egg",
                    "nutrition": {"values": {"calories": "72", "protein": null, "fat": true}}
                }
            }],
            "edges": []
        })
        .to_string();
        let graph = import_recipe(&text).unwrap();
        let values = graph
            .node(&NodeId::new("a"))
            .and_then(|n| n.as_ingredient())
            .and_then(|d| d.nutrition())
            .and_then(NutritionRecord::macros)
            .unwrap();
        assert_eq!(values, Macros::new(72.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_newer_version_still_reads() {
        let text = json!({"version": 9, "nodes": [{"id": "a", "type": "step"}], "edges": []})
            .to_string();
        assert_eq!(import_recipe(&text).unwrap().node_count(), 1);
    }
}
