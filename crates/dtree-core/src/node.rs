//! Tree nodes: leaves holding content and containers holding children.
//!
//! Nodes are never mutated once built. Updates go through [`Container::set_at`],
//! which returns a new container whose ancestors along the path are fresh
//! allocations while every untouched sibling is the very same `Arc` as
//! before. Renderers can therefore skip any subtree whose pointer did not
//! change.

use std::fmt;
use std::sync::{Arc, OnceLock};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::error::{AddressingError, AppendError};
use crate::generation::Generation;
use crate::path::DeltaPath;

bitflags! {
    /// Container flags the engine itself interprets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u8 {
        /// Keep the container through pruning even when it has no children.
        const ALLOW_EMPTY = 1 << 0;
    }
}

/// How a container lays out its children. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockLayout {
    #[default]
    Vertical,
    Horizontal,
    Column {
        weight: f64,
    },
    Expandable {
        label: String,
        #[serde(default)]
        expanded: bool,
    },
}

/// Container-level configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockConfig {
    pub flags: BlockFlags,
    pub layout: BlockLayout,
}

impl BlockConfig {
    /// Vertical container that survives pruning when empty.
    #[must_use]
    pub fn allow_empty() -> Self {
        Self {
            flags: BlockFlags::ALLOW_EMPTY,
            layout: BlockLayout::Vertical,
        }
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: BlockLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Whether the container survives pruning with zero children.
    #[must_use]
    pub fn allows_empty(&self) -> bool {
        self.flags.contains(BlockFlags::ALLOW_EMPTY)
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            flags: BlockFlags::empty(),
            layout: BlockLayout::Vertical,
        }
    }
}

/// Sizing hints attached to a leaf. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeafMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A terminal node carrying one content payload.
pub struct Leaf<C: Content> {
    content: C,
    metadata: LeafMetadata,
    generation: Generation,
    derived: OnceLock<C::Derived>,
}

impl<C: Content> Leaf<C> {
    #[must_use]
    pub fn new(content: C, metadata: LeafMetadata, generation: Generation) -> Self {
        Self {
            content,
            metadata,
            generation,
            derived: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    #[must_use]
    pub fn metadata(&self) -> &LeafMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Derived representation of the content, computed on first access.
    ///
    /// The memo is filled at most once. A leaf whose content changes is a new
    /// leaf with an empty memo.
    pub fn derived(&self) -> &C::Derived {
        self.derived.get_or_init(|| self.content.derive())
    }

    /// Whether [`derived`](Self::derived) has been computed yet.
    #[must_use]
    pub fn has_derived(&self) -> bool {
        self.derived.get().is_some()
    }

    /// New leaf with `increment` folded into the content, stamped `generation`.
    pub fn appended(
        &self,
        increment: &C::Increment,
        generation: Generation,
    ) -> Result<Self, AppendError> {
        let content = self.content.append(increment)?;
        Ok(Self::new(content, self.metadata, generation))
    }
}

impl<C: Content> fmt::Debug for Leaf<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("content", &self.content)
            .field("metadata", &self.metadata)
            .field("generation", &self.generation)
            .field("has_derived", &self.has_derived())
            .finish()
    }
}

/// A non-terminal node: ordered children plus configuration.
///
/// Children order is rendering order.
#[derive(Debug, Clone)]
pub struct Container<C: Content> {
    children: Arc<[Node<C>]>,
    config: BlockConfig,
    generation: Generation,
}

impl<C: Content> Container<C> {
    #[must_use]
    pub fn new(
        children: impl Into<Arc<[Node<C>]>>,
        config: BlockConfig,
        generation: Generation,
    ) -> Self {
        Self {
            children: children.into(),
            config,
            generation,
        }
    }

    /// Container with no children.
    #[must_use]
    pub fn empty(config: BlockConfig, generation: Generation) -> Self {
        Self::new(Vec::new(), config, generation)
    }

    /// Same children (shared, not copied) under a new configuration.
    #[must_use]
    pub fn reconfigured(&self, config: BlockConfig, generation: Generation) -> Self {
        Self {
            children: Arc::clone(&self.children),
            config,
            generation,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Node<C>] {
        &self.children
    }

    #[must_use]
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    #[must_use]
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether both containers share the very same children sequence.
    #[must_use]
    pub fn children_ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.children, &other.children)
    }

    /// Resolve `path` against this container's children.
    ///
    /// Returns `None` for an empty path, an out-of-range index at any level,
    /// or a path that continues below a leaf.
    #[must_use]
    pub fn get_at(&self, path: &[usize]) -> Option<&Node<C>> {
        let (&index, rest) = path.split_first()?;
        let child = self.children.get(index)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.get_at(rest)
        }
    }

    /// Copy of this container with `node` placed at `path`.
    ///
    /// Every container along the path is rebuilt and stamped `generation`;
    /// everything else is shared. The final index may equal the child count,
    /// which appends.
    pub fn set_at(
        &self,
        path: &[usize],
        node: Node<C>,
        generation: &Generation,
    ) -> Result<Self, AddressingError> {
        if path.is_empty() {
            return Err(AddressingError::EmptyPath);
        }
        self.set_at_depth(path, 0, node, generation)
    }

    fn set_at_depth(
        &self,
        path: &[usize],
        depth: usize,
        node: Node<C>,
        generation: &Generation,
    ) -> Result<Self, AddressingError> {
        let index = path[depth];
        let len = self.children.len();
        let last = depth + 1 == path.len();
        if index > len || (!last && index == len) {
            return Err(AddressingError::IndexOutOfBounds {
                path: DeltaPath::from_slice(path),
                depth,
                index,
                len,
            });
        }

        let replacement = if last {
            node
        } else {
            let Node::Container(child) = &self.children[index] else {
                return Err(AddressingError::ThroughLeaf {
                    path: DeltaPath::from_slice(path),
                    depth,
                });
            };
            Node::Container(Arc::new(child.set_at_depth(
                path,
                depth + 1,
                node,
                generation,
            )?))
        };

        let mut children = self.children.to_vec();
        if index == len {
            children.push(replacement);
        } else {
            children[index] = replacement;
        }

        Ok(Self {
            children: children.into(),
            config: self.config.clone(),
            generation: generation.clone(),
        })
    }

    /// Rebuild this container keeping only nodes of `current`.
    ///
    /// A container from another generation is dropped with everything under
    /// it. A current container whose children all pruned away is dropped too,
    /// unless it allows being empty. When nothing underneath was dropped the
    /// children sequence is shared with `self`.
    #[must_use]
    pub fn prune_stale(&self, current: &Generation) -> Option<Self> {
        if self.generation != *current {
            return None;
        }

        let mut changed = false;
        let mut kept = Vec::with_capacity(self.children.len());
        for child in self.children.iter() {
            match child.prune_stale(current) {
                Some(survivor) => {
                    changed |= !survivor.ptr_eq(child);
                    kept.push(survivor);
                }
                None => changed = true,
            }
        }

        if kept.is_empty() && !self.config.allows_empty() {
            return None;
        }

        let children = if changed {
            kept.into()
        } else {
            Arc::clone(&self.children)
        };
        Some(Self {
            children,
            config: self.config.clone(),
            generation: current.clone(),
        })
    }

    /// Push every leaf's content beneath this container onto `out`.
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a C>) {
        for child in self.children.iter() {
            child.collect_leaves(out);
        }
    }

    /// Number of leaves beneath this container.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(Node::leaf_count).sum()
    }
}

/// A node of the tree.
///
/// Cloning a node clones a pointer; identity is observable through
/// [`Node::ptr_eq`].
#[derive(Debug, Clone)]
pub enum Node<C: Content> {
    Leaf(Arc<Leaf<C>>),
    Container(Arc<Container<C>>),
}

impl<C: Content> Node<C> {
    /// Wrap a new leaf.
    #[must_use]
    pub fn leaf(content: C, metadata: LeafMetadata, generation: Generation) -> Self {
        Self::Leaf(Arc::new(Leaf::new(content, metadata, generation)))
    }

    /// Wrap a container.
    #[must_use]
    pub fn container(container: Container<C>) -> Self {
        Self::Container(Arc::new(container))
    }

    #[must_use]
    pub fn generation(&self) -> &Generation {
        match self {
            Self::Leaf(leaf) => leaf.generation(),
            Self::Container(container) => container.generation(),
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf<C>> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Container(_) => None,
        }
    }

    #[must_use]
    pub fn as_container(&self) -> Option<&Container<C>> {
        match self {
            Self::Leaf(_) => None,
            Self::Container(container) => Some(container),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Reference identity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => Arc::ptr_eq(a, b),
            (Self::Container(a), Self::Container(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Resolve `path` below this node. Leaves resolve nothing.
    #[must_use]
    pub fn get_at(&self, path: &[usize]) -> Option<&Node<C>> {
        match self {
            Self::Leaf(_) => None,
            Self::Container(container) => container.get_at(path),
        }
    }

    /// Prune this node for `current`; `None` when it should disappear.
    ///
    /// Fully current subtrees come back as the same instance.
    #[must_use]
    pub fn prune_stale(&self, current: &Generation) -> Option<Self> {
        match self {
            Self::Leaf(leaf) => (leaf.generation() == current).then(|| self.clone()),
            Self::Container(container) => {
                let pruned = container.prune_stale(current)?;
                if pruned.children_ptr_eq(container) {
                    Some(self.clone())
                } else {
                    Some(Self::container(pruned))
                }
            }
        }
    }

    /// Push every leaf's content at or beneath this node onto `out`.
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a C>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf.content()),
            Self::Container(container) => container.collect_leaves(out),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Container(container) => container.leaf_count(),
        }
    }
}
