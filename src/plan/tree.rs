//! Accessibility tree model and the `wait_for` matcher.
//!
//! The backend reports the UI as arbitrary nested JSON. It is converted into a
//! [`UiNode`] and searched depth-first by [`UiTarget::matches`]; the first
//! matching node anywhere in the tree ends the search.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute holding an element's accessibility identifier.
pub const AX_UNIQUE_ID: &str = "AXUniqueId";
/// Attribute holding an element's accessibility label.
pub const AX_LABEL: &str = "AXLabel";
/// Attribute holding an element's current value.
pub const AX_VALUE: &str = "AXValue";

/// One node of an untyped accessibility tree.
#[derive(Debug, Clone, PartialEq)]
pub enum UiNode {
    Object(BTreeMap<String, UiNode>),
    Array(Vec<UiNode>),
    /// Strings, numbers, and booleans in their textual form; `null` is empty.
    Scalar(String),
}

impl UiNode {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(UiNode::from(value))
    }

    /// Scalar attribute `key` of an object node, or `""`.
    pub fn attribute(&self, key: &str) -> &str {
        match self {
            UiNode::Object(fields) => match fields.get(key) {
                Some(UiNode::Scalar(value)) => value,
                _ => "",
            },
            _ => "",
        }
    }
}

impl From<serde_json::Value> for UiNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Object(map) => UiNode::Object(
                map.into_iter()
                    .map(|(key, value)| (key, UiNode::from(value)))
                    .collect(),
            ),
            Value::Array(items) => UiNode::Array(items.into_iter().map(UiNode::from).collect()),
            Value::String(s) => UiNode::Scalar(s),
            Value::Null => UiNode::Scalar(String::new()),
            other => UiNode::Scalar(other.to_string()),
        }
    }
}

/// Predicate for `wait_for`: any one satisfied clause is a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
}

impl UiTarget {
    /// True when no clause has a non-blank value.
    pub fn is_empty(&self) -> bool {
        [&self.id, &self.label, &self.contains]
            .iter()
            .all(|clause| clause.as_deref().map(str::trim).unwrap_or("").is_empty())
    }

    /// Search `root` depth-first for a node satisfying this target.
    ///
    /// A node matches when its `AXUniqueId` equals `id`, its `AXLabel` equals
    /// `label`, or `contains` occurs in its `AXLabel` or `AXValue`. All
    /// comparisons ignore case; blank clauses never match.
    pub fn matches(&self, root: &UiNode) -> bool {
        let id = self.id.as_deref().unwrap_or("").trim().to_lowercase();
        let label = self.label.as_deref().unwrap_or("").trim().to_lowercase();
        let contains = self.contains.as_deref().unwrap_or("").trim().to_lowercase();
        node_matches(root, &id, &label, &contains)
    }
}

/// `id`, `label`, and `contains` are already trimmed and lowercased.
fn node_matches(node: &UiNode, id: &str, label: &str, contains: &str) -> bool {
    match node {
        UiNode::Object(fields) => {
            let node_label = node.attribute(AX_LABEL).to_lowercase();
            if !id.is_empty() && node.attribute(AX_UNIQUE_ID).to_lowercase() == id {
                return true;
            }
            if !label.is_empty() && node_label == label {
                return true;
            }
            if !contains.is_empty()
                && (node_label.contains(contains)
                    || node.attribute(AX_VALUE).to_lowercase().contains(contains))
            {
                return true;
            }
            fields
                .values()
                .any(|child| node_matches(child, id, label, contains))
        }
        UiNode::Array(items) => items
            .iter()
            .any(|child| node_matches(child, id, label, contains)),
        UiNode::Scalar(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(id: Option<&str>, label: Option<&str>, contains: Option<&str>) -> UiTarget {
        UiTarget {
            id: id.map(str::to_string),
            label: label.map(str::to_string),
            contains: contains.map(str::to_string),
        }
    }

    fn tree() -> UiNode {
        UiNode::from(json!([
            {
                "AXLabel": "Window",
                "children": [
                    {
                        "AXLabel": "Toolbar",
                        "children": [
                            { "AXUniqueId": "settings-button", "AXLabel": "Settings" }
                        ]
                    },
                    {
                        "AXLabel": "Search",
                        "AXValue": "Coffee near me",
                        "frame": { "x": 0, "y": 10 }
                    }
                ]
            }
        ]))
    }

    #[test]
    fn test_matches_label_case_insensitively_at_any_depth() {
        assert!(target(None, Some("settings"), None).matches(&tree()));
        assert!(target(None, Some("  TOOLBAR "), None).matches(&tree()));
        assert!(!target(None, Some("Sett"), None).matches(&tree()));
    }

    #[test]
    fn test_matches_unique_id() {
        assert!(target(Some("SETTINGS-BUTTON"), None, None).matches(&tree()));
        assert!(!target(Some("missing"), None, None).matches(&tree()));
    }

    #[test]
    fn test_contains_checks_label_and_value() {
        assert!(target(None, None, Some("coffee")).matches(&tree()));
        assert!(target(None, None, Some("OOLBA")).matches(&tree()));
        assert!(!target(None, None, Some("tea")).matches(&tree()));
    }

    #[test]
    fn test_any_clause_is_sufficient() {
        assert!(target(Some("missing"), Some("Search"), None).matches(&tree()));
    }

    #[test]
    fn test_blank_target_never_matches() {
        let blank = target(Some(" "), Some(""), None);
        assert!(blank.is_empty());
        assert!(!blank.matches(&tree()));
        assert!(!UiTarget::default().matches(&UiNode::from(json!({ "AXLabel": "" }))));
    }

    #[test]
    fn test_deep_nesting() {
        let mut value = json!({ "AXLabel": "Ready" });
        for _ in 0..50 {
            value = json!({ "children": [ value ] });
        }
        assert!(target(None, Some("ready"), None).matches(&UiNode::from(value)));
    }

    #[test]
    fn test_scalar_conversion() {
        let node = UiNode::from(json!({ "AXValue": 42, "AXLabel": null, "enabled": true }));
        assert_eq!(node.attribute(AX_VALUE), "42");
        assert_eq!(node.attribute(AX_LABEL), "");
        assert_eq!(node.attribute("enabled"), "true");
        assert!(target(None, None, Some("42")).matches(&node));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(UiNode::parse("warning: not json").is_err());
        assert!(UiNode::parse(r#"{"AXLabel":"Ready"}"#).is_ok());
    }
}
