//! The tree root and its two fixed regions.

use std::sync::Arc;

use crate::content::Content;
use crate::error::{StructuralError, TreeError};
use crate::generation::Generation;
use crate::node::{BlockConfig, Container, LeafMetadata, Node};
use crate::path::RootContainer;

/// An immutable UI tree.
///
/// The root is an invisible container whose children are exactly the `main`
/// and `sidebar` region containers, in that order. Every operation returns a
/// new tree; a published tree is never modified, so holders may keep it as
/// long as they like.
#[derive(Debug, Clone)]
pub struct Tree<C: Content> {
    root: Container<C>,
}

impl<C: Content> Tree<C> {
    /// Wrap `root`, checking that it holds exactly two region containers.
    pub fn new(root: Container<C>) -> Result<Self, StructuralError> {
        if root.len() != RootContainer::ALL.len() {
            return Err(StructuralError::RootChildCount { actual: root.len() });
        }
        if let Some(index) = root.children().iter().position(Node::is_leaf) {
            return Err(StructuralError::RegionNotContainer { index });
        }
        Ok(Self { root })
    }

    /// Tree with both regions empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_regions(Vec::new(), Generation::unset())
    }

    /// Tree whose `main` region shows a single placeholder leaf.
    #[must_use]
    pub fn with_placeholder(content: C) -> Self {
        let unset = Generation::unset();
        let waiting = Node::leaf(content, LeafMetadata::default(), unset.clone());
        Self::from_regions(vec![waiting], unset)
    }

    fn from_regions(main_children: Vec<Node<C>>, generation: Generation) -> Self {
        let main = Container::new(main_children, BlockConfig::allow_empty(), generation.clone());
        let sidebar = Container::empty(BlockConfig::allow_empty(), generation.clone());
        Self {
            root: Container::new(
                vec![Node::container(main), Node::container(sidebar)],
                BlockConfig::allow_empty(),
                generation,
            ),
        }
    }

    /// The invisible super-root.
    #[must_use]
    pub fn root(&self) -> &Container<C> {
        &self.root
    }

    #[must_use]
    pub fn main(&self) -> &Container<C> {
        self.region(RootContainer::Main)
    }

    #[must_use]
    pub fn sidebar(&self) -> &Container<C> {
        self.region(RootContainer::Sidebar)
    }

    #[must_use]
    pub fn region(&self, region: RootContainer) -> &Container<C> {
        self.region_node(region)
    }

    fn region_node(&self, region: RootContainer) -> &Arc<Container<C>> {
        match &self.root.children()[region.index()] {
            Node::Container(container) => container,
            Node::Leaf(_) => unreachable!("tree regions are validated as containers"),
        }
    }

    /// Node at `path` (first index selects the region), if any.
    #[must_use]
    pub fn get_at(&self, path: &[usize]) -> Option<&Node<C>> {
        self.root.get_at(path)
    }

    /// New tree with `node` placed at `path`; see [`Container::set_at`].
    pub fn set_at(
        &self,
        path: &[usize],
        node: Node<C>,
        generation: &Generation,
    ) -> Result<Self, TreeError> {
        RootContainer::of_path(path)?;
        let root = self.root.set_at(path, node, generation)?;
        Ok(Self::new(root)?)
    }

    /// New tree keeping only nodes of `current`.
    ///
    /// The two regions always survive: a region that pruned away entirely is
    /// replaced by an empty container with the same configuration, and a
    /// current region left empty is kept as it is. The root is stamped
    /// `current`.
    #[must_use]
    pub fn prune_stale(&self, current: &Generation) -> Self {
        let _span = crate::debug_span!("prune_stale", generation = %current).entered();

        let regions: Vec<Node<C>> = RootContainer::ALL
            .into_iter()
            .map(|region| {
                let existing = self.region_node(region);
                match existing.prune_stale(current) {
                    Some(pruned) if pruned.children_ptr_eq(existing) => {
                        Node::Container(Arc::clone(existing))
                    }
                    Some(pruned) => Node::container(pruned),
                    None if existing.generation() == current && existing.is_empty() => {
                        Node::Container(Arc::clone(existing))
                    }
                    None => Node::container(Container::empty(
                        existing.config().clone(),
                        current.clone(),
                    )),
                }
            })
            .collect();

        let pruned = Self {
            root: Container::new(regions, BlockConfig::allow_empty(), current.clone()),
        };
        crate::debug!(
            leaves_before = self.leaf_count(),
            leaves_after = pruned.leaf_count(),
            "pruned stale nodes"
        );
        pruned
    }

    /// Content of every leaf in the tree, depth-first in rendering order.
    #[must_use]
    pub fn collect_leaves(&self) -> Vec<&C> {
        let mut leaves = Vec::new();
        self.root.collect_leaves(&mut leaves);
        leaves
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}

impl<C: Content> Default for Tree<C> {
    fn default() -> Self {
        Self::empty()
    }
}
