//! Property-based invariant tests for the delta tree.
//!
//! These tests verify invariants that must hold for any tree reachable by
//! applying well-formed mutations:
//!
//! 1. Write-then-read returns exactly the node written.
//! 2. Writes leave unrelated subtrees untouched, by reference identity.
//! 3. Pruning is idempotent.
//! 4. Reconfiguring a container keeps its children (order and identity).
//! 5. Appending A then B equals appending A combined with B.
//! 6. A rejected write leaves the original tree unchanged.

use dtree_core::{
    AddressingError, BlockConfig, DeltaPath, Generation, LeafMetadata, Mutation, Node, Tree,
    TreeError, apply_mutation,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Leaf { target: usize, body: String, run: u8 },
    Block { target: usize, allow_empty: bool, run: u8 },
    Region { sidebar: bool, allow_empty: bool, run: u8 },
}

fn generation(run: u8) -> Generation {
    Generation::new(format!("run-{}", run % 2))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), "[a-z]{1,6}", any::<u8>())
            .prop_map(|(target, body, run)| Op::Leaf { target, body, run }),
        1 => (any::<usize>(), any::<bool>(), any::<u8>())
            .prop_map(|(target, allow_empty, run)| Op::Block { target, allow_empty, run }),
        1 => (any::<bool>(), any::<bool>(), any::<u8>())
            .prop_map(|(sidebar, allow_empty, run)| Op::Region { sidebar, allow_empty, run }),
    ]
}

fn tree_strategy() -> impl Strategy<Value = Tree<String>> {
    prop::collection::vec(op_strategy(), 0..40).prop_map(|ops| build_tree(&ops))
}

fn block_config(allow_empty: bool) -> BlockConfig {
    if allow_empty {
        BlockConfig::allow_empty()
    } else {
        BlockConfig::default()
    }
}

/// Apply `ops`, each appending a node to an existing container or
/// reconfiguring a region in place.
fn build_tree(ops: &[Op]) -> Tree<String> {
    let mut tree = Tree::empty();
    for op in ops {
        if let Op::Region { sidebar, allow_empty, run } = op {
            let mutation = Mutation::SetContainer {
                path: DeltaPath::from_slice(&[usize::from(*sidebar)]),
                config: block_config(*allow_empty),
            };
            tree = apply_mutation(&tree, &mutation, &generation(*run)).expect("region exists");
            continue;
        }
        let containers = container_paths(&tree);
        let (target, run) = match op {
            Op::Leaf { target, run, .. } | Op::Block { target, run, .. } => (*target, *run),
            Op::Region { .. } => continue,
        };
        let parent = &containers[target % containers.len()];
        let mut path = parent.clone();
        let len = tree
            .get_at(parent)
            .and_then(Node::as_container)
            .map_or(0, |c| c.len());
        path.push(len);

        let mutation = match op {
            Op::Leaf { body, .. } => Mutation::SetLeaf {
                path,
                content: body.clone(),
                metadata: LeafMetadata::default(),
            },
            Op::Block { allow_empty, .. } => Mutation::SetContainer {
                path,
                config: block_config(*allow_empty),
            },
            Op::Region { .. } => continue,
        };
        tree = apply_mutation(&tree, &mutation, &generation(run)).expect("append is valid");
    }
    tree
}

fn walk(node: &Node<String>, path: &mut DeltaPath, out: &mut Vec<(DeltaPath, bool)>) {
    out.push((path.clone(), node.is_leaf()));
    if let Some(container) = node.as_container() {
        for (i, child) in container.children().iter().enumerate() {
            path.push(i);
            walk(child, path, out);
            path.pop();
        }
    }
}

/// Every node path in the tree, flagged with whether it is a leaf.
fn all_paths(tree: &Tree<String>) -> Vec<(DeltaPath, bool)> {
    let mut out = Vec::new();
    for (i, region) in tree.root().children().iter().enumerate() {
        let mut path = DeltaPath::from_slice(&[i]);
        walk(region, &mut path, &mut out);
    }
    out
}

fn container_paths(tree: &Tree<String>) -> Vec<DeltaPath> {
    all_paths(tree)
        .into_iter()
        .filter(|(_, leaf)| !leaf)
        .map(|(path, _)| path)
        .collect()
}

/// Structural fingerprint: kinds, contents, flags and generations.
fn shape(node: &Node<String>) -> String {
    match node {
        Node::Leaf(leaf) => format!("L({}@{})", leaf.content(), leaf.generation()),
        Node::Container(container) => {
            let children: Vec<String> = container.children().iter().map(shape).collect();
            format!(
                "C[{}]({}@{})",
                u8::from(container.config().allows_empty()),
                children.join(","),
                container.generation()
            )
        }
    }
}

fn tree_shape(tree: &Tree<String>) -> String {
    tree.root().children().iter().map(shape).collect::<Vec<_>>().join(" | ")
}

fn is_prefix(prefix: &[usize], path: &[usize]) -> bool {
    path.len() >= prefix.len() && &path[..prefix.len()] == prefix
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Write-then-read
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn write_then_read(tree in tree_strategy(), pick in any::<usize>(), body in "[a-z]{1,4}") {
        let paths = all_paths(&tree);
        let (path, _) = &paths[pick % paths.len()];
        prop_assume!(path.len() > 1, "regions cannot be replaced by leaves");

        let g = Generation::new("writer");
        let node = Node::leaf(body, LeafMetadata::default(), g.clone());
        let written = tree.set_at(path, node.clone(), &g).expect("existing path is valid");
        let read = written.get_at(path).expect("written node is reachable");
        prop_assert!(read.ptr_eq(&node));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Unrelated subtrees keep their identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn writes_share_unrelated_subtrees(
        tree in tree_strategy(),
        pick in any::<usize>(),
        body in "[a-z]{1,4}",
    ) {
        let paths = all_paths(&tree);
        let (target, _) = &paths[pick % paths.len()];
        prop_assume!(target.len() > 1);

        let g = Generation::new("writer");
        let written = tree
            .set_at(target, Node::leaf(body, LeafMetadata::default(), g.clone()), &g)
            .expect("existing path is valid");

        for (other, _) in &paths {
            if is_prefix(other, target) || is_prefix(target, other) {
                continue;
            }
            let before = tree.get_at(other).expect("path came from this tree");
            let after = written.get_at(other).expect("unrelated path survives");
            prop_assert!(before.ptr_eq(after), "subtree at {:?} was copied", other);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Pruning is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prune_is_idempotent(tree in tree_strategy(), run in any::<u8>()) {
        let current = generation(run);
        let once = tree.prune_stale(&current);
        let twice = once.prune_stale(&current);
        prop_assert_eq!(tree_shape(&once), tree_shape(&twice));
        for (a, b) in once.root().children().iter().zip(twice.root().children()) {
            prop_assert!(a.ptr_eq(b), "second prune rebuilt a region");
        }
    }

    #[test]
    fn prune_leaves_only_current_nodes(tree in tree_strategy(), run in any::<u8>()) {
        let current = generation(run);
        let pruned = tree.prune_stale(&current);
        for (path, _) in all_paths(&pruned) {
            let node = pruned.get_at(&path).expect("walked path resolves");
            prop_assert_eq!(node.generation(), &current);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reconfiguring a container keeps its children
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_container_preserves_children(
        tree in tree_strategy(),
        pick in any::<usize>(),
        allow_empty in any::<bool>(),
    ) {
        let containers = container_paths(&tree);
        let path = &containers[pick % containers.len()];
        prop_assume!(path.len() > 1);

        let before = tree.get_at(path).and_then(Node::as_container).expect("container").clone();
        let config = if allow_empty { BlockConfig::allow_empty() } else { BlockConfig::default() };
        let g = Generation::new("reconfigure");
        let mutation = Mutation::SetContainer { path: path.clone(), config: config.clone() };
        let after_tree = apply_mutation(&tree, &mutation, &g).expect("valid path");
        let after = after_tree.get_at(path).and_then(Node::as_container).expect("container");

        prop_assert!(after.children_ptr_eq(&before));
        prop_assert_eq!(after.config(), &config);
        prop_assert_eq!(after.generation(), &g);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Append associativity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn append_is_associative(base in "[a-z]{0,8}", a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let g = Generation::new("append");
        let path = DeltaPath::from_slice(&[0, 0]);
        let seeded = apply_mutation(
            &Tree::empty(),
            &Mutation::SetLeaf { path: path.clone(), content: base, metadata: LeafMetadata::default() },
            &g,
        ).expect("append to main");

        let append = |tree: &Tree<String>, more: String| {
            apply_mutation(tree, &Mutation::AppendToLeaf { path: path.clone(), increment: more }, &g)
                .expect("leaf exists")
        };
        let stepwise = append(&append(&seeded, a.clone()), b.clone());
        let combined = append(&seeded, format!("{a}{b}"));

        let content = |tree: &Tree<String>| {
            tree.get_at(&path).and_then(Node::as_leaf).map(|leaf| leaf.content().clone())
        };
        prop_assert_eq!(content(&stepwise), content(&combined));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Rejected writes leave the tree unchanged
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_range_write_is_rejected(tree in tree_strategy(), pick in any::<usize>(), extra in 1usize..5) {
        let containers = container_paths(&tree);
        let parent = &containers[pick % containers.len()];
        let len = tree.get_at(parent).and_then(Node::as_container).expect("container").len();
        let mut path = parent.clone();
        path.push(len + extra);

        let shape_before = tree_shape(&tree);
        let g = Generation::new("bad");
        let result = tree.set_at(&path, Node::leaf("x".to_string(), LeafMetadata::default(), g.clone()), &g);
        let is_out_of_bounds = matches!(
            result,
            Err(TreeError::Addressing(AddressingError::IndexOutOfBounds { .. }))
        );
        prop_assert!(is_out_of_bounds);
        prop_assert_eq!(tree_shape(&tree), shape_before);
    }
}
