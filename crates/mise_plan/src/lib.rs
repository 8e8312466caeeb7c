//! MISE Planner
//!
//! Recipe graphs of ingredients, steps, and outputs, together with the
//! derivations every consumer shares: a deterministic topological order,
//! structural validation, and a narrated dry run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod graph;
pub mod narrate;
pub mod order;
pub mod validate;

pub use graph::{
    Edge, EdgeData, EdgeStyle, IngredientData, Node, NodeData, NodeKind, OutputData, Position,
    RecipeGraph, Servings, StepData,
};
pub use narrate::{join_readable, simulate_execute, ExecutionError, Narrator, SourceValue, Trace};
pub use order::{topological_sort, TopoOrder};
pub use validate::{validate_graph, ValidationError, Validator};
