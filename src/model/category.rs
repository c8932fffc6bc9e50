//! Category tree and paths into it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of the category tree.
///
/// Children keep the order the backend delivered them in; that order is
/// what menus display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Create a leaf node.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with children.
    pub fn branch(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Create the implicit root wrapping the top-level categories.
    #[must_use]
    pub fn root(children: Vec<Self>) -> Self {
        Self {
            name: String::new(),
            children,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth of the subtree below this node (a leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.descendant_count() + 1)
            .sum()
    }
}

/// Shape of the category endpoint's body.
///
/// The backend normally wraps top-level categories in an unnamed root, but
/// a bare list of top-level nodes is accepted as well.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryPayload {
    Root(CategoryNode),
    Forest(Vec<CategoryNode>),
}

impl CategoryPayload {
    /// Normalize into a root node.
    #[must_use]
    pub fn into_root(self) -> CategoryNode {
        match self {
            Self::Root(root) => root,
            Self::Forest(children) => CategoryNode::root(children),
        }
    }
}

/// Ordered category names leading from the root to one node.
///
/// A path says nothing about whether it is valid in a given tree; lookups
/// against a tree that no longer contains it simply find nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    /// The empty path (the root).
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// New path with `name` appended.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// New path without its last segment; the root stays the root.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    /// New path keeping only the first `depth` segments.
    #[must_use]
    pub fn truncated(&self, depth: usize) -> Self {
        Self(self.0.iter().take(depth).cloned().collect())
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Query parameters `category1..categoryN`, one per selected depth.
    #[must_use]
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, name)| (format!("category{}", i + 1), name.clone()))
            .collect()
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones() -> CategoryNode {
        CategoryNode::root(vec![CategoryNode::branch(
            "Phones",
            vec![
                CategoryNode::leaf("iPhone"),
                CategoryNode::branch("Samsung", vec![CategoryNode::leaf("Galaxy S")]),
            ],
        )])
    }

    #[test]
    fn test_payload_root_and_forest() {
        let root: CategoryPayload =
            serde_json::from_str(r#"{"name": "", "children": [{"name": "Phones", "children": []}]}"#)
                .unwrap();
        let forest: CategoryPayload =
            serde_json::from_str(r#"[{"name": "Phones", "children": []}]"#).unwrap();
        assert_eq!(root.into_root(), forest.into_root());
    }

    #[test]
    fn test_missing_children_means_leaf() {
        let node: CategoryNode = serde_json::from_str(r#"{"name": "Akku"}"#).unwrap();
        assert!(node.is_leaf());
    }

    #[test]
    fn test_depth_and_count() {
        let tree = phones();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.descendant_count(), 4);
    }

    #[test]
    fn test_path_query_params() {
        let path = CategoryPath::from_segments(["Phones", "iPhone"]);
        assert_eq!(
            path.query_params(),
            vec![
                ("category1".to_string(), "Phones".to_string()),
                ("category2".to_string(), "iPhone".to_string()),
            ]
        );
        assert!(CategoryPath::root().query_params().is_empty());
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert!(CategoryPath::root().parent().is_root());
        let path = CategoryPath::from_segments(["a", "b"]);
        assert_eq!(path.parent(), CategoryPath::from_segments(["a"]));
        assert_eq!(path.to_string(), "a > b");
    }
}
