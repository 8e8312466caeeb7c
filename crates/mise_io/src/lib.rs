//! MISE Recipe Documents
//!
//! Reads and writes the JSON recipe document shared with the editor:
//! `{version, nodes: [...], edges: [...]}`. Import is forgiving about
//! missing ids, positions, and edge decoration, and strict about node
//! kinds and attribute shapes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod export;
pub mod import;

mod document;

pub use error::{ExportError, ImportError};
pub use export::{export_recipe, export_recipe_with, ExportConfig};
pub use import::{import_recipe, import_recipe_with, ImportConfig};
