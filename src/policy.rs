//! Placeholder tag selection
//!
//! A widget embedded in an HTML panel is stood in for by an empty element
//! until runtime attaches the real widget. That stand-in must be legal where
//! it sits: a `<table>` holds row groups, a `<ul>` holds items. The policy
//! maps a parent tag to the one child tag its content model permits.

use std::collections::HashMap;

use crate::tree::{MarkupTree, NodeId};

/// Placeholder used when the parent imposes no content model
pub const DEFAULT_PLACEHOLDER_TAG: &str = "span";

/// Parent tag -> legal child tag
const LEGAL_CHILD_ELEMENTS: &[(&str, &str)] = &[
    ("table", "tbody"),
    ("thead", "tr"),
    ("tbody", "tr"),
    ("tfoot", "tr"),
    ("ul", "li"),
    ("ol", "li"),
    ("dl", "dt"),
];

/// Immutable mapping from parent tag to placeholder tag
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderPolicy {
    legal_children: HashMap<String, String>,
    default_tag: String,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self {
            legal_children: LEGAL_CHILD_ELEMENTS
                .iter()
                .map(|(parent, child)| (parent.to_string(), child.to_string()))
                .collect(),
            default_tag: DEFAULT_PLACEHOLDER_TAG.to_string(),
        }
    }
}

impl PlaceholderPolicy {
    /// Create the built-in policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with no rules, only a fallback tag
    pub fn empty(default_tag: impl Into<String>) -> Self {
        Self {
            legal_children: HashMap::new(),
            default_tag: default_tag.into(),
        }
    }

    /// Add or override the placeholder for a parent tag
    pub fn with_rule(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.legal_children.insert(parent.into(), child.into());
        self
    }

    /// Set the fallback tag
    pub fn with_default_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tag = tag.into();
        self
    }

    pub fn default_tag(&self) -> &str {
        &self.default_tag
    }

    /// Placeholder tag for a child of `parent`; exact, case-sensitive lookup
    pub fn placeholder_for_parent(&self, parent: Option<&str>) -> &str {
        parent
            .and_then(|p| self.legal_children.get(p))
            .map(String::as_str)
            .unwrap_or(self.default_tag.as_str())
    }

    /// Placeholder tag legal in the position `elem` currently occupies
    pub fn legal_placeholder_tag(&self, tree: &MarkupTree, elem: NodeId) -> &str {
        self.placeholder_for_parent(tree.parent_element(elem).map(|p| p.local_name.as_str()))
    }

    /// All rules sorted by parent tag
    pub fn rules(&self) -> Vec<(&str, &str)> {
        let mut rules: Vec<(&str, &str)> = self
            .legal_children
            .iter()
            .map(|(parent, child)| (parent.as_str(), child.as_str()))
            .collect();
        rules.sort();
        rules
    }
}
