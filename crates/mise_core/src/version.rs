//! Recipe document format version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag written into every exported recipe document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatVersion(pub u32);

impl FormatVersion {
    /// The version this crate writes
    pub const CURRENT: Self = Self(1);

    /// Whether a document with this version can be read
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.0 <= Self::CURRENT.0
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
