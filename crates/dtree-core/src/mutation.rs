//! Typed mutation records.

use std::fmt;

use crate::content::Content;
use crate::node::{BlockConfig, LeafMetadata};
use crate::path::DeltaPath;

/// One addressed instruction from the message producer.
#[derive(Debug, Clone)]
pub enum Mutation<C: Content> {
    /// Place a fresh leaf at `path`, replacing whatever was there.
    SetLeaf {
        path: DeltaPath,
        content: C,
        metadata: LeafMetadata,
    },
    /// Place a container at `path`, keeping the children of an existing
    /// container there.
    SetContainer { path: DeltaPath, config: BlockConfig },
    /// Fold `increment` into the content of the leaf at `path`.
    AppendToLeaf {
        path: DeltaPath,
        increment: C::Increment,
    },
}

impl<C: Content> Mutation<C> {
    #[must_use]
    pub fn path(&self) -> &[usize] {
        match self {
            Self::SetLeaf { path, .. }
            | Self::SetContainer { path, .. }
            | Self::AppendToLeaf { path, .. } => path.as_slice(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::SetLeaf { .. } => MutationKind::SetLeaf,
            Self::SetContainer { .. } => MutationKind::SetContainer,
            Self::AppendToLeaf { .. } => MutationKind::AppendToLeaf,
        }
    }
}

/// Discriminant of a [`Mutation`], named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    SetLeaf,
    SetContainer,
    AppendToLeaf,
}

impl MutationKind {
    pub const ALL: [Self; 3] = [Self::SetLeaf, Self::SetContainer, Self::AppendToLeaf];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetLeaf => "set_leaf",
            Self::SetContainer => "set_container",
            Self::AppendToLeaf => "append_to_leaf",
        }
    }

    /// Kind for a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
