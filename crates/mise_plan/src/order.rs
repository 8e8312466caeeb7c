//! Deterministic topological ordering.
//!
//! Kahn's algorithm. The queue is seeded with zero in-degree nodes in
//! insertion order and successors are released in edge insertion order,
//! so ties always break by input order. Validation, narration, and
//! nutrition propagation all consume this one result.

use super::graph::{Node, RecipeGraph};
use indexmap::{IndexMap, IndexSet};
use mise_core::NodeId;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Result of ordering a recipe graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopoOrder {
    /// Nodes that could be ordered, predecessors first
    pub order: Vec<NodeId>,
    /// Whether some nodes sit on or behind a cycle
    pub has_cycle: bool,
    /// Nodes left unordered, in insertion order
    pub remaining: Vec<NodeId>,
}

impl TopoOrder {
    /// Resolve the ordered ids back to nodes
    pub fn nodes<'a>(&'a self, graph: &'a RecipeGraph) -> impl Iterator<Item = &'a Node> + 'a {
        self.order.iter().filter_map(move |id| graph.node(id))
    }
}

/// Order the graph's nodes so that every edge points forward
#[must_use]
pub fn topological_sort(graph: &RecipeGraph) -> TopoOrder {
    let mut in_degree: IndexMap<&NodeId, usize> = graph.nodes().map(|n| (n.id(), 0)).collect();
    let mut successors: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();

    for edge in graph.edges() {
        if let Some(degree) = in_degree.get_mut(&edge.target) {
            *degree += 1;
        }
        successors.entry(&edge.source).or_default().push(&edge.target);
    }

    let mut queue: VecDeque<&NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut placed: IndexSet<&NodeId> = IndexSet::with_capacity(in_degree.len());
    while let Some(current) = queue.pop_front() {
        placed.insert(current);
        for next in successors.get(current).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(*next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(*next);
                }
            }
        }
    }

    let remaining: Vec<NodeId> = graph
        .nodes()
        .map(Node::id)
        .filter(|id| !placed.contains(id))
        .cloned()
        .collect();

    if !remaining.is_empty() {
        debug!(
            ordered = placed.len(),
            unordered = remaining.len(),
            "Graph ordering stopped at a cycle"
        );
    }

    TopoOrder {
        order: placed.into_iter().cloned().collect(),
        has_cycle: !remaining.is_empty(),
        remaining,
    }
}
