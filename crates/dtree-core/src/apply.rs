//! The mutation applier.
//!
//! Each mutation kind is a pure function of `(tree, mutation, generation)`.
//! Mutations must be applied in the order a run produced them: appends and
//! container reconfiguration both read what earlier mutations left at their
//! path.

use std::sync::Arc;

use crate::content::Content;
use crate::error::{AddressingError, TreeError};
use crate::generation::Generation;
use crate::mutation::Mutation;
use crate::node::{BlockConfig, Container, Leaf, LeafMetadata, Node};
use crate::path::{DeltaPath, RootContainer};
use crate::tree::Tree;

/// Apply one mutation, returning the tree that results.
///
/// On error `tree` is untouched and no partial result exists.
pub fn apply_mutation<C: Content>(
    tree: &Tree<C>,
    mutation: &Mutation<C>,
    generation: &Generation,
) -> Result<Tree<C>, TreeError> {
    RootContainer::of_path(mutation.path())?;
    crate::trace!(
        kind = mutation.kind().name(),
        path = %crate::path::display(mutation.path()),
        generation = %generation,
        "applying mutation"
    );

    match mutation {
        Mutation::SetLeaf {
            path,
            content,
            metadata,
        } => set_leaf(tree, path, content.clone(), *metadata, generation),
        Mutation::SetContainer { path, config } => {
            set_container(tree, path, config.clone(), generation)
        }
        Mutation::AppendToLeaf { path, increment } => {
            append_to_leaf(tree, path, increment, generation)
        }
    }
}

fn set_leaf<C: Content>(
    tree: &Tree<C>,
    path: &[usize],
    content: C,
    metadata: LeafMetadata,
    generation: &Generation,
) -> Result<Tree<C>, TreeError> {
    let leaf = Node::leaf(content, metadata, generation.clone());
    tree.set_at(path, leaf, generation)
}

fn set_container<C: Content>(
    tree: &Tree<C>,
    path: &[usize],
    config: BlockConfig,
    generation: &Generation,
) -> Result<Tree<C>, TreeError> {
    // An existing container hands its children over so that reconfiguring a
    // block does not reset the widgets inside it. Anything else at the path
    // (nothing, or a leaf) starts the container out empty.
    let container = match tree.get_at(path) {
        Some(Node::Container(existing)) => existing.reconfigured(config, generation.clone()),
        Some(Node::Leaf(_)) => {
            crate::debug!(
                path = %crate::path::display(path),
                "container replaces a leaf; starting with no children"
            );
            Container::empty(config, generation.clone())
        }
        None => Container::empty(config, generation.clone()),
    };
    tree.set_at(path, Node::container(container), generation)
}

fn append_to_leaf<C: Content>(
    tree: &Tree<C>,
    path: &[usize],
    increment: &C::Increment,
    generation: &Generation,
) -> Result<Tree<C>, TreeError> {
    let existing: &Leaf<C> = match tree.get_at(path) {
        Some(Node::Leaf(leaf)) => &**leaf,
        Some(Node::Container(_)) => {
            return Err(AddressingError::NotALeaf {
                path: DeltaPath::from_slice(path),
            }
            .into());
        }
        None => {
            return Err(AddressingError::NotFound {
                path: DeltaPath::from_slice(path),
            }
            .into());
        }
    };

    let grown = existing
        .appended(increment, generation.clone())
        .map_err(|source| TreeError::Append {
            path: DeltaPath::from_slice(path),
            source,
        })?;
    tree.set_at(path, Node::Leaf(Arc::new(grown)), generation)
}
