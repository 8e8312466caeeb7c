//! Import and export errors.

use mise_core::CoreError;

/// Import error. No partial graph is returned alongside any of these.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Text is not JSON, even after trimming to the outermost braces
    #[error("Invalid recipe JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required top-level key is absent or null
    #[error("Invalid recipe file: missing \"{key}\"")]
    MissingKey {
        /// The missing key
        key: &'static str,
    },

    /// Node type outside ingredient/step/output
    #[error("Unknown node type: {kind}")]
    UnknownNodeKind {
        /// The type as written
        kind: String,
    },

    /// Attribute bag does not fit its kind
    #[error("Invalid data for {id}: {reason}")]
    InvalidData {
        /// Node id
        id: String,
        /// Why it was rejected
        reason: String,
    },

    /// Graph rejected an entity, e.g. a duplicate node id
    #[error(transparent)]
    Graph(#[from] CoreError),
}

/// Export error
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Serialization failed
    #[error("Failed to encode recipe: {0}")]
    Encode(#[from] serde_json::Error),
}
