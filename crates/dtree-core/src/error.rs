//! Error types for tree addressing and mutation.
//!
//! None of these ever leave a half-applied tree behind: every operation is
//! pure and only produces a new [`Tree`](crate::Tree) on success, so the
//! previously published tree stays valid whatever goes wrong.

use std::fmt;

use crate::path::{self, DeltaPath};

/// A path that does not address what the operation needs.
///
/// These indicate a protocol violation by the message producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressingError {
    /// A non-empty path was required.
    EmptyPath,
    /// An index was outside `[0, len]` (or outside `[0, len)` before the
    /// final segment, where appending is not allowed).
    IndexOutOfBounds {
        path: DeltaPath,
        depth: usize,
        index: usize,
        len: usize,
    },
    /// The path continues below a leaf.
    ThroughLeaf { path: DeltaPath, depth: usize },
    /// The first index names neither `main` nor `sidebar`.
    UnknownRootContainer { path: DeltaPath, index: usize },
    /// Nothing exists at the path.
    NotFound { path: DeltaPath },
    /// The node at the path is a container where a leaf was required.
    NotALeaf { path: DeltaPath },
}

impl fmt::Display for AddressingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "empty path"),
            Self::IndexOutOfBounds {
                path,
                depth,
                index,
                len,
            } => write!(
                f,
                "bad index {index} at depth {depth} of {} (should be between [0, {len}])",
                path::display(path)
            ),
            Self::ThroughLeaf { path, depth } => write!(
                f,
                "path {} continues below a leaf at depth {depth}",
                path::display(path)
            ),
            Self::UnknownRootContainer { path, index } => write!(
                f,
                "unrecognized root container {index} in path {}",
                path::display(path)
            ),
            Self::NotFound { path } => write!(f, "no node at {}", path::display(path)),
            Self::NotALeaf { path } => {
                write!(f, "node at {} is not a leaf", path::display(path))
            }
        }
    }
}

impl std::error::Error for AddressingError {}

/// The root does not hold exactly the two region containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    RootChildCount { actual: usize },
    RegionNotContainer { index: usize },
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootChildCount { actual } => {
                write!(f, "invalid root node: expected 2 children, got {actual}")
            }
            Self::RegionNotContainer { index } => {
                write!(f, "invalid root node: child {index} is not a container")
            }
        }
    }
}

impl std::error::Error for StructuralError {}

/// Content refused an incremental update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendError {
    pub reason: String,
}

impl AppendError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot append: {}", self.reason)
    }
}

impl std::error::Error for AppendError {}

/// Failure of a tree-producing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    Addressing(AddressingError),
    Structure(StructuralError),
    Append { path: DeltaPath, source: AppendError },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addressing(err) => write!(f, "{err}"),
            Self::Structure(err) => write!(f, "{err}"),
            Self::Append { path, source } => {
                write!(f, "leaf at {}: {source}", path::display(path))
            }
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Addressing(err) => Some(err),
            Self::Structure(err) => Some(err),
            Self::Append { source, .. } => Some(source),
        }
    }
}

impl From<AddressingError> for TreeError {
    fn from(err: AddressingError) -> Self {
        Self::Addressing(err)
    }
}

impl From<StructuralError> for TreeError {
    fn from(err: StructuralError) -> Self {
        Self::Structure(err)
    }
}
