//! Structural paths and the two fixed root regions.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::AddressingError;

/// Sequence of child indices locating a node from the tree root.
///
/// Real paths are short (region, a couple of nested blocks, the element), so
/// they live inline.
pub type DeltaPath = SmallVec<[usize; 8]>;

/// The two top-level regions every tree owns, by child index of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootContainer {
    Main = 0,
    Sidebar = 1,
}

impl RootContainer {
    /// Both regions in root child order.
    pub const ALL: [Self; 2] = [Self::Main, Self::Sidebar];

    /// Child index of this region under the root.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Region for a root child index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Main),
            1 => Some(Self::Sidebar),
            _ => None,
        }
    }

    /// Region a delta path is addressed to.
    pub fn of_path(path: &[usize]) -> Result<Self, AddressingError> {
        let Some(&first) = path.first() else {
            return Err(AddressingError::EmptyPath);
        };
        Self::from_index(first).ok_or_else(|| AddressingError::UnknownRootContainer {
            path: DeltaPath::from_slice(path),
            index: first,
        })
    }

    /// Lowercase name used in logs and outlines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sidebar => "sidebar",
        }
    }
}

impl fmt::Display for RootContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display adapter rendering a path as `[0, 1, 2]`.
#[derive(Debug, Clone, Copy)]
pub struct PathDisplay<'a>(&'a [usize]);

/// Wrap a path for display.
#[must_use]
pub fn display(path: &[usize]) -> PathDisplay<'_> {
    PathDisplay(path)
}

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}
