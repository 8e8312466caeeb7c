//! Narrated dry run of a recipe.
//!
//! Walks the topological order once, memoizing what each node produces
//! so its successors can describe their inputs. A cyclic graph is refused
//! outright; there is no partial narrative.

use super::graph::{Node, NodeData, RecipeGraph, Servings};
use super::order::topological_sort;
use indexmap::IndexMap;
use mise_core::NodeId;
use serde::Serialize;

/// Execution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The graph contains a cycle
    #[error("Cannot execute: graph has a cycle.")]
    Cycle {
        /// Nodes left unordered
        remaining: Vec<NodeId>,
    },
}

/// What a node produces during a dry run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceValue {
    /// A raw ingredient
    Ingredient {
        /// Ingredient label
        name: Option<String>,
        /// Entered amount
        amount: Option<String>,
    },
    /// The result of a step
    Mix {
        /// Step label
        step: Option<String>,
        /// Step action
        action: Option<String>,
        /// The sentence describing the step
        description: String,
    },
    /// A finished dish
    Dish {
        /// Dish label
        name: Option<String>,
        /// Serving count
        serves: Option<Servings>,
        /// What went into it
        inputs: Vec<SourceValue>,
    },
}

/// Narrative lines plus the value memoized for each node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    /// One line per node, in execution order
    pub lines: Vec<String>,
    /// Value produced by each node
    pub values: IndexMap<NodeId, SourceValue>,
}

impl Trace {
    /// The narrative as newline-joined text
    #[must_use]
    pub fn narrative(&self) -> String {
        self.lines.join("\n")
    }
}

/// Builds the dry-run narrative
#[derive(Debug, Clone, Copy, Default)]
pub struct Narrator;

impl Narrator {
    /// Create a new narrator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run the recipe without side effects
    ///
    /// # Errors
    ///
    /// Returns error if the graph has a cycle
    pub fn trace(&self, graph: &RecipeGraph) -> Result<Trace, ExecutionError> {
        let ordering = topological_sort(graph);
        if ordering.has_cycle {
            return Err(ExecutionError::Cycle {
                remaining: ordering.remaining,
            });
        }

        let mut trace = Trace::default();
        for node in ordering.nodes(graph) {
            let (line, value) = match node.data() {
                NodeData::Ingredient(data) => (
                    format!(
                        "🧂 {} ({})",
                        text(&data.label),
                        text(&data.amount)
                    ),
                    SourceValue::Ingredient {
                        name: data.label.clone(),
                        amount: data.amount.clone(),
                    },
                ),
                NodeData::Step(data) => {
                    let items: Vec<String> = graph
                        .incoming(node.id())
                        .map(|edge| phrase(trace.values.get(&edge.source), edge.use_amount()))
                        .collect();
                    let verb = non_blank(&data.action)
                        .or_else(|| non_blank(&data.label))
                        .unwrap_or("Step");
                    let sentence = format!("{} {}", verb, join_readable(&items)).trim().to_string();
                    (
                        format!("👩‍🍳 {} — {}", text(&data.label), sentence),
                        SourceValue::Mix {
                            step: data.label.clone(),
                            action: data.action.clone(),
                            description: sentence,
                        },
                    )
                }
                NodeData::Output(data) => {
                    let inputs = inputs_of(graph, node, &trace);
                    let serves = data
                        .serves
                        .as_ref()
                        .filter(|s| !s.is_blank())
                        .map_or_else(|| "?".to_string(), ToString::to_string);
                    (
                        format!("🍽️ Output: {} (serves {})", text(&data.label), serves),
                        SourceValue::Dish {
                            name: data.label.clone(),
                            serves: data.serves.clone(),
                            inputs,
                        },
                    )
                }
            };
            trace.lines.push(line);
            trace.values.insert(node.id().clone(), value);
        }

        Ok(trace)
    }
}

/// Values already computed for the sources feeding `node`
fn inputs_of(graph: &RecipeGraph, node: &Node, trace: &Trace) -> Vec<SourceValue> {
    graph
        .incoming(node.id())
        .filter_map(|edge| trace.values.get(&edge.source).cloned())
        .collect()
}

/// Describe one input of a step
fn phrase(source: Option<&SourceValue>, use_amount: Option<&str>) -> String {
    let (name, own_amount) = match source {
        Some(SourceValue::Ingredient { name, amount }) => {
            (text(name).to_string(), non_blank(amount))
        }
        Some(SourceValue::Mix { step, action, .. }) => {
            let base = non_blank(step)
                .or_else(|| non_blank(action))
                .unwrap_or("previous step");
            (format!("the result of {}", base), None)
        }
        Some(SourceValue::Dish { name, .. }) => (
            format!("the result of {}", non_blank(name).unwrap_or("previous step")),
            None,
        ),
        None => ("the result of previous step".to_string(), None),
    };

    match use_amount.or(own_amount) {
        Some(used) => format!("{} of {}", used, name),
        None => name,
    }
}

/// Join items as natural language: `A`, `A and B`, `A, B, and C`
#[must_use]
pub fn join_readable(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Run the recipe and return the narrative text
///
/// # Errors
///
/// Returns error if the graph has a cycle
pub fn simulate_execute(graph: &RecipeGraph) -> Result<String, ExecutionError> {
    Narrator::new().trace(graph).map(|trace| trace.narrative())
}
