//! Identifiers for recipe graph entities.
//!
//! Ids are opaque strings chosen by the editor. When a document arrives
//! without an id, a name-based UUID (v5) is derived from the entity's
//! position in the document so repeated imports agree on the result.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for generated node ids
const NODE_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6d, 0x69, 0x73, 0x65, 0x2d, 0x6e, 0x6f, 0x64, 0x65, 0x2d, 0x6e, 0x73, 0x00, 0x00, 0x00, 0x01,
]);

/// Namespace for generated edge ids
const EDGE_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6d, 0x69, 0x73, 0x65, 0x2d, 0x65, 0x64, 0x67, 0x65, 0x2d, 0x6e, 0x73, 0x00, 0x00, 0x00, 0x02,
]);

/// Node identifier - identifies a recipe graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create from an editor-supplied id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an id for the node at `index` in a document that omitted one
    #[must_use]
    pub fn generated(index: usize) -> Self {
        let uuid = Uuid::new_v5(&NODE_NAMESPACE, format!("node:{}", index).as_bytes());
        Self(format!("nd_{}", uuid.simple()))
    }

    /// Get as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Edge identifier - identifies a recipe graph edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Create from an editor-supplied id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an id for the edge at `index` in a document that omitted one
    #[must_use]
    pub fn generated(index: usize) -> Self {
        let uuid = Uuid::new_v5(&EDGE_NAMESPACE, format!("edge:{}", index).as_bytes());
        Self(format!("e_{}", uuid.simple()))
    }

    /// Get as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EdgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new("flour");
        assert_eq!(format!("{}", id), "flour");
        assert_eq!(id.as_str(), "flour");
    }

    #[test]
    fn test_generated_ids_are_stable() {
        assert_eq!(NodeId::generated(3), NodeId::generated(3));
        assert_ne!(NodeId::generated(3), NodeId::generated(4));
        assert!(NodeId::generated(0).as_str().starts_with("nd_"));
        assert!(EdgeId::generated(0).as_str().starts_with("e_"));
    }

    #[test]
    fn test_node_and_edge_namespaces_differ() {
        let node = NodeId::generated(1);
        let edge = EdgeId::generated(1);
        assert_ne!(node.as_str().trim_start_matches("nd_"), edge.as_str().trim_start_matches("e_"));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = EdgeId::from("e1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"e1\"");
        let back: EdgeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
