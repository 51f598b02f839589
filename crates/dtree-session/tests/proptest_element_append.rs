//! Property-based tests for element append rules.
//!
//! 1. Appending A then B equals appending A combined with B, for every
//!    element/delta pairing, including the rejected ones.
//! 2. A rejected append never changes the element.

use dtree_core::Content;
use dtree_session::{Element, ElementDelta, TableData};
use proptest::prelude::*;
use serde_json::{Value, json};

// ── Helpers ─────────────────────────────────────────────────────────────

fn row_strategy(width: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(any::<i32>().prop_map(|n| json!(n)), width..=width)
}

/// Rows for a table of `width` columns, occasionally one cell short.
fn rows_strategy(width: usize) -> impl Strategy<Value = Vec<Vec<Value>>> {
    prop::collection::vec(
        prop_oneof![
            9 => row_strategy(width),
            1 => row_strategy(width.saturating_sub(1)),
        ],
        0..4,
    )
}

fn element_strategy() -> impl Strategy<Value = Element> {
    prop_oneof![
        "[a-z ]{0,8}".prop_map(Element::text),
        "[a-z#]{0,8}".prop_map(|body| Element::Markdown { body }),
        ("[a-z();]{0,8}", prop::option::of("[a-z]{2,4}"))
            .prop_map(|(body, language)| Element::Code { body, language }),
        (1usize..4).prop_map(|width| {
            Element::Table(TableData::new((0..width).map(|c| format!("c{c}"))))
        }),
        (0u8..=100).prop_map(|value| Element::Progress { value }),
        Just(Element::Empty),
    ]
}

fn delta_strategy() -> impl Strategy<Value = ElementDelta> {
    prop_oneof![
        "[a-z\n]{0,6}".prop_map(|body| ElementDelta::Text { body }),
        (1usize..4).prop_flat_map(rows_strategy).prop_map(|rows| ElementDelta::Rows { rows }),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Associativity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn append_is_associative(
        base in element_strategy(),
        a in delta_strategy(),
        b in delta_strategy(),
    ) {
        let Some(ab) = a.combined(&b) else {
            return Ok(());
        };
        let stepwise = base.append(&a).and_then(|mid| mid.append(&b));
        let combined = base.append(&ab);
        prop_assert_eq!(stepwise.ok(), combined.ok());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Rejection is side-effect free
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rejected_append_keeps_element(base in element_strategy(), delta in delta_strategy()) {
        let before = base.clone();
        if base.append(&delta).is_err() {
            prop_assert_eq!(base, before);
        }
    }

    #[test]
    fn accepted_append_preserves_kind(base in element_strategy(), delta in delta_strategy()) {
        if let Ok(grown) = base.append(&delta) {
            prop_assert_eq!(grown.kind(), base.kind());
        }
    }
}
