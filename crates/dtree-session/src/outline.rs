//! Plain-text outline of an element tree.
//!
//! ```text
//! main [vertical, allow_empty] @r1
//!   text: Ahoy!
//!   [horizontal] @r1
//!     button: Go #go
//! sidebar [vertical, allow_empty] @r1
//! ```

use std::fmt::Write as _;

use dtree_core::{BlockLayout, Container, Node, RootContainer, Tree};

use crate::element::Element;

const INDENT: &str = "  ";

/// Render `tree` one node per line, children indented under their parent.
#[must_use]
pub fn outline(tree: &Tree<Element>) -> String {
    let mut out = String::new();
    for region in RootContainer::ALL {
        let container = tree.region(region);
        container_line(&mut out, 0, Some(region.name()), container);
        for child in container.children() {
            node_lines(&mut out, 1, child);
        }
    }
    out
}

fn node_lines(out: &mut String, depth: usize, node: &Node<Element>) {
    match node {
        Node::Leaf(leaf) => {
            push_indent(out, depth);
            let element = leaf.content();
            let summary = element.summary();
            if summary.is_empty() {
                let _ = writeln!(out, "{}", element.kind());
            } else {
                let _ = writeln!(out, "{}: {summary}", element.kind());
            }
        }
        Node::Container(container) => {
            container_line(out, depth, None, container);
            for child in container.children() {
                node_lines(out, depth + 1, child);
            }
        }
    }
}

fn container_line(
    out: &mut String,
    depth: usize,
    name: Option<&str>,
    container: &Container<Element>,
) {
    push_indent(out, depth);
    if let Some(name) = name {
        out.push_str(name);
        out.push(' ');
    }
    let config = container.config();
    let layout = layout_label(&config.layout);
    if config.allows_empty() {
        let _ = write!(out, "[{layout}, allow_empty]");
    } else {
        let _ = write!(out, "[{layout}]");
    }
    let _ = writeln!(out, " @{}", container.generation());
}

fn layout_label(layout: &BlockLayout) -> String {
    match layout {
        BlockLayout::Vertical => "vertical".to_string(),
        BlockLayout::Horizontal => "horizontal".to_string(),
        BlockLayout::Column { weight } => format!("column {weight}"),
        BlockLayout::Expandable { label, expanded } => {
            let state = if *expanded { "open" } else { "closed" };
            format!("expandable {label:?} {state}")
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
