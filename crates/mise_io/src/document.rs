//! Wire shapes of a recipe document.

use mise_core::{EdgeId, FormatVersion, NodeId};
use mise_plan::{EdgeData, EdgeStyle, NodeKind, Position};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct RecipeDocument<'a> {
    pub version: FormatVersion,
    pub nodes: Vec<NodeEntry<'a>>,
    pub edges: Vec<EdgeEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NodeEntry<'a> {
    pub id: &'a NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct EdgeEntry<'a> {
    pub id: &'a EdgeId,
    pub source: &'a NodeId,
    pub target: &'a NodeId,
    pub data: &'a EdgeData,
    #[serde(flatten)]
    pub style: &'a EdgeStyle,
}
