//! Structural validation for recipe graphs.
//!
//! The validator reports objective defects only: outputs and steps with
//! nothing feeding them, ingredients that are fed by something, and
//! cycles. It does not require every ingredient to reach an output.

use super::graph::{Node, NodeKind, RecipeGraph};
use super::order::topological_sort;
use mise_core::NodeId;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Output node with no incoming edge
    #[error("Output \"{label}\" has no inputs.")]
    OutputWithoutInput {
        /// Offending node
        node_id: NodeId,
        /// Its label, or its id when unlabeled
        label: String,
    },
    /// Ingredient node with an incoming edge
    #[error("Ingredient \"{label}\" cannot have inputs.")]
    IngredientWithInput {
        /// Offending node
        node_id: NodeId,
        /// Its label, or its id when unlabeled
        label: String,
    },
    /// Step node with no incoming edge
    #[error("Step \"{label}\" has no inputs.")]
    StepWithoutInput {
        /// Offending node
        node_id: NodeId,
        /// Its label, or its id when unlabeled
        label: String,
    },
    /// Cycle detected in graph
    #[error("Cycle detected among nodes: {}", join_ids(.nodes))]
    Cycle {
        /// Nodes left unordered
        nodes: Vec<NodeId>,
    },
}

fn join_ids(nodes: &[NodeId]) -> String {
    nodes.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}

/// Validator for recipe graph structure
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a graph.
    ///
    /// Errors come grouped by rule, each group in node insertion order:
    /// outputs without inputs, ingredients with inputs, steps without
    /// inputs, then at most one cycle error.
    #[must_use]
    pub fn validate(&self, graph: &RecipeGraph) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        errors.extend(
            self.nodes_of(graph, NodeKind::Output)
                .filter(|n| !has_inputs(graph, n))
                .map(|n| ValidationError::OutputWithoutInput {
                    node_id: n.id().clone(),
                    label: display_name(n),
                }),
        );

        errors.extend(
            self.nodes_of(graph, NodeKind::Ingredient)
                .filter(|n| has_inputs(graph, n))
                .map(|n| ValidationError::IngredientWithInput {
                    node_id: n.id().clone(),
                    label: display_name(n),
                }),
        );

        errors.extend(
            self.nodes_of(graph, NodeKind::Step)
                .filter(|n| !has_inputs(graph, n))
                .map(|n| ValidationError::StepWithoutInput {
                    node_id: n.id().clone(),
                    label: display_name(n),
                }),
        );

        let ordering = topological_sort(graph);
        if ordering.has_cycle {
            errors.push(ValidationError::Cycle {
                nodes: ordering.remaining,
            });
        }

        errors
    }

    fn nodes_of<'a>(
        &self,
        graph: &'a RecipeGraph,
        kind: NodeKind,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        graph.nodes().filter(move |n| n.kind() == kind)
    }
}

fn has_inputs(graph: &RecipeGraph, node: &Node) -> bool {
    graph.incoming(node.id()).next().is_some()
}

fn display_name(node: &Node) -> String {
    node.label()
        .map_or_else(|| node.id().to_string(), str::to_string)
}

/// Validate a graph and render each error as a message
#[must_use]
pub fn validate_graph(graph: &RecipeGraph) -> Vec<String> {
    Validator::new()
        .validate(graph)
        .iter()
        .map(ToString::to_string)
        .collect()
}
