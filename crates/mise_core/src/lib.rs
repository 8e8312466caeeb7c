//! MISE Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! Everything here is shared by the planner, the nutrition propagator,
//! and the recipe document codec.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod macros;
pub mod nutrition;
pub mod version;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use id::{EdgeId, NodeId};
pub use macros::{coerce_number, Macros};
pub use nutrition::{AmountView, NutritionRecord, Stored, StoredValue};
pub use version::FormatVersion;
