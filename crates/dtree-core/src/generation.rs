//! Run generation tokens.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of the script run that produced, or last confirmed, a node.
///
/// Generations are opaque: the engine only ever compares them for equality.
/// Cloning is a reference-count bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(Arc<str>);

impl Generation {
    /// Raw id of the generation carried by nodes created before any run.
    pub const UNSET_ID: &'static str = "NO_RUN_ID";

    /// Create a generation from a run id.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The generation of nodes that no run has produced yet.
    #[must_use]
    pub fn unset() -> Self {
        Self(Arc::from(Self::UNSET_ID))
    }

    /// Whether this is the [`unset`](Self::unset) generation.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        &*self.0 == Self::UNSET_ID
    }

    /// Raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::unset()
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Generation {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Generation {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
