use appshots::plan::{UiNode, UiTarget};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Bury `leaf` under `depth` alternating object/array wrappers.
fn nest(leaf: Value, depth: usize) -> Value {
    (0..depth).fold(leaf, |inner, level| {
        if level % 2 == 0 {
            json!([{ "AXLabel": "container" }, inner])
        } else {
            json!({ "AXLabel": "group", "children": inner })
        }
    })
}

proptest! {
    #[test]
    fn prop_label_matches_at_any_depth_ignoring_case(
        label in "[A-Za-z][A-Za-z ]{0,15}",
        depth in 0usize..8,
        upper in any::<bool>(),
    ) {
        prop_assume!(!label.trim().is_empty());
        prop_assume!(!label.trim().eq_ignore_ascii_case("container"));
        prop_assume!(!label.trim().eq_ignore_ascii_case("group"));

        let tree = nest(json!({ "AXLabel": label.trim() }), depth);
        let root = UiNode::parse(&tree.to_string()).unwrap();

        let query = if upper { label.to_uppercase() } else { label.to_lowercase() };
        let target = UiTarget { label: Some(query), ..UiTarget::default() };
        prop_assert!(target.matches(&root));

        let missing = UiTarget { id: Some(format!("{}-missing", label.trim())), ..UiTarget::default() };
        prop_assert!(!missing.matches(&root));
    }
}
