//! Recipe export.

use crate::document::{EdgeEntry, NodeEntry, RecipeDocument};
use crate::error::ExportError;
use mise_core::FormatVersion;
use mise_plan::RecipeGraph;

/// Export configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// Indent the document
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl ExportConfig {
    /// Set whether the document is indented
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Export a graph as an indented recipe document
///
/// # Errors
///
/// Returns error if a node's attributes cannot be encoded
pub fn export_recipe(graph: &RecipeGraph) -> Result<String, ExportError> {
    export_recipe_with(graph, &ExportConfig::default())
}

/// Export a graph as a recipe document
///
/// # Errors
///
/// Returns error if a node's attributes cannot be encoded
pub fn export_recipe_with(
    graph: &RecipeGraph,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    let nodes = graph
        .nodes()
        .map(|node| -> Result<NodeEntry<'_>, ExportError> {
            Ok(NodeEntry {
                id: node.id(),
                kind: node.kind(),
                position: node.position(),
                data: node.data().to_value()?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeEntry {
            id: &edge.id,
            source: &edge.source,
            target: &edge.target,
            data: &edge.data,
            style: &edge.style,
        })
        .collect();

    let document = RecipeDocument {
        version: FormatVersion::CURRENT,
        nodes,
        edges,
    };

    let text = if config.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(text)
}
