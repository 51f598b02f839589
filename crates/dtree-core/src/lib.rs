#![forbid(unsafe_code)]

//! Core: the immutable, path-addressed node tree and the delta applier.
//!
//! A backend re-executes a script and streams mutation records ("deltas")
//! describing the UI it produced. This crate rebuilds a [`Tree`] from those
//! records without ever mutating a node that a renderer may still hold:
//! every update path-copies the ancestors of the changed node and shares all
//! other subtrees by reference.
//!
//! ```text
//! root (invisible)
//! ├── main      Container
//! │   ├── Leaf  (text: "Ahoy!")
//! │   └── Container (columns)
//! │       └── Leaf (button)
//! └── sidebar   Container
//!     └── Leaf  (checkbox)
//! ```
//!
//! Nodes carry the [`Generation`] of the run that produced (or last
//! confirmed) them, and [`Tree::prune_stale`] sweeps away everything an
//! earlier run left behind.

pub mod apply;
pub mod content;
pub mod error;
pub mod generation;
pub mod logging;
pub mod mutation;
pub mod node;
pub mod path;
pub mod tree;

pub use apply::apply_mutation;
pub use content::Content;
pub use error::{AddressingError, AppendError, StructuralError, TreeError};
pub use generation::Generation;
pub use mutation::{Mutation, MutationKind};
pub use node::{BlockConfig, BlockFlags, BlockLayout, Container, Leaf, LeafMetadata, Node};
pub use path::{DeltaPath, RootContainer};
pub use tree::Tree;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
