//! Invalidation descriptors
//!
//! The unit of invalidation, both internally ("what to delete") and on
//! the sync channel wire. A descriptor is either a literal key or a
//! wildcard pattern, never both.

use serde::{Deserialize, Serialize};

/// A single invalidation target
///
/// Serializes to exactly one of the wire forms used on the sync channel:
///
/// ```json
/// {"key": "recipes:detail:r1:public:v1"}
/// {"pattern": "recipes:list:*"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationDescriptor {
    /// A literal cache key, deleted directly
    Key(String),
    /// A glob pattern, resolved by a cursor-based scan at invalidation time
    Pattern(String),
}

impl InvalidationDescriptor {
    /// Descriptor for a literal key
    pub fn key<S: Into<String>>(key: S) -> Self {
        Self::Key(key.into())
    }

    /// Descriptor for a wildcard pattern
    pub fn pattern<S: Into<String>>(pattern: S) -> Self {
        Self::Pattern(pattern.into())
    }

    /// Whether this descriptor is a pattern
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    /// The key or pattern string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Key(s) | Self::Pattern(s) => s,
        }
    }
}
