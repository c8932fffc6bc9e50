//! Category tree navigation.
//!
//! The free functions are total over any path, valid or not: a path that
//! does not resolve in the tree has no children, it is never an error. The
//! same functions back both surfaces a shop front end offers, one dropdown
//! per tree level and a single stacked drill-down menu ([`CategoryNavigator`]).
//!
//! Every lookup walks from the root. Trees seen in practice are at most five
//! levels deep, so there is no path index.

use crate::model::{CategoryNode, CategoryPath};

/// Outcome of choosing a category under some path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The chosen node has children; the menu continues below it.
    InProgress(CategoryPath),
    /// The chosen node is a leaf; the path becomes the active filter.
    Committed(CategoryPath),
    /// No child of that name exists under the path.
    NotFound,
}

impl Advance {
    /// The resulting path, if the choice matched a node.
    #[must_use]
    pub const fn path(&self) -> Option<&CategoryPath> {
        match self {
            Self::InProgress(path) | Self::Committed(path) => Some(path),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Node reached by following `path` from `root`.
#[must_use]
pub fn resolve<'a>(root: &'a CategoryNode, path: &CategoryPath) -> Option<&'a CategoryNode> {
    path.segments()
        .iter()
        .try_fold(root, |node, name| node.child(name))
}

/// Ordered children of the node reached by `path`; empty if any segment
/// fails to match.
#[must_use]
pub fn children_at<'a>(root: &'a CategoryNode, path: &CategoryPath) -> &'a [CategoryNode] {
    resolve(root, path)
        .map(|node| node.children.as_slice())
        .unwrap_or_default()
}

/// Choose `name` among the children of `path`.
#[must_use]
pub fn advance(root: &CategoryNode, path: &CategoryPath, name: &str) -> Advance {
    match children_at(root, path).iter().find(|c| c.name == name) {
        Some(node) if !node.is_leaf() => Advance::InProgress(path.child(name)),
        Some(_) => Advance::Committed(path.child(name)),
        None => Advance::NotFound,
    }
}

/// Drop the last segment of `path`; the root stays the root.
#[must_use]
pub fn retreat(path: &CategoryPath) -> CategoryPath {
    path.parent()
}

/// Choice sets for a per-level dropdown surface.
///
/// Entry `i` holds the options of dropdown `i`, i.e. the children of the
/// first `i` segments. A trailing entry for the level below the full path is
/// included when that level has options. Stops at the first level that
/// resolves to nothing.
#[must_use]
pub fn level_options<'a>(root: &'a CategoryNode, path: &CategoryPath) -> Vec<&'a [CategoryNode]> {
    let mut levels = Vec::with_capacity(path.len() + 1);
    for depth in 0..=path.len() {
        let options = children_at(root, &path.truncated(depth));
        if options.is_empty() {
            break;
        }
        levels.push(options);
    }
    levels
}

/// Set dropdown `depth` to `name`, discarding any deeper selection.
#[must_use]
pub fn select_at_level(
    root: &CategoryNode,
    path: &CategoryPath,
    depth: usize,
    name: &str,
) -> Advance {
    advance(root, &path.truncated(depth), name)
}

/// Category selection state for both surfaces.
///
/// `menu` is the submenu open in the stacked drill-down menu; committing a
/// leaf closes it back to the root. `selection` is the path shown across the
/// per-level dropdowns and survives a commit, so any level can be re-picked
/// afterwards. The committed path itself is handed back to the caller to
/// store as the active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryNavigator {
    menu: CategoryPath,
    selection: CategoryPath,
}

impl CategoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the submenu currently shown.
    #[must_use]
    pub const fn menu_path(&self) -> &CategoryPath {
        &self.menu
    }

    /// Path the dropdowns currently show, committed or not.
    #[must_use]
    pub const fn selection(&self) -> &CategoryPath {
        &self.selection
    }

    /// Options of the submenu currently shown.
    #[must_use]
    pub fn options<'a>(&self, root: &'a CategoryNode) -> &'a [CategoryNode] {
        children_at(root, &self.menu)
    }

    /// Dropdown choice sets over the current selection.
    #[must_use]
    pub fn levels<'a>(&self, root: &'a CategoryNode) -> Vec<&'a [CategoryNode]> {
        level_options(root, &self.selection)
    }

    fn apply(&mut self, outcome: &Advance) {
        match outcome {
            Advance::InProgress(path) => {
                self.menu = path.clone();
                self.selection = path.clone();
            }
            Advance::Committed(path) => {
                self.menu = CategoryPath::root();
                self.selection = path.clone();
            }
            Advance::NotFound => {}
        }
    }

    /// Pick `name` in the current submenu.
    pub fn choose(&mut self, root: &CategoryNode, name: &str) -> Advance {
        let outcome = advance(root, &self.menu, name);
        self.apply(&outcome);
        outcome
    }

    /// Set dropdown `depth` of the current selection to `name`.
    ///
    /// Anything below `depth` is discarded first. Works the same before and
    /// after a leaf was committed.
    pub fn select_at_level(&mut self, root: &CategoryNode, depth: usize, name: &str) -> Advance {
        let outcome = select_at_level(root, &self.selection, depth, name);
        self.apply(&outcome);
        outcome
    }

    /// Show `path` as the selection without going through the menu.
    pub fn set_selection(&mut self, path: CategoryPath) {
        self.menu = CategoryPath::root();
        self.selection = path;
    }

    /// Go up one submenu.
    pub fn back(&mut self) {
        self.menu = retreat(&self.menu);
    }

    /// Close the menu back to the top level.
    pub fn reset(&mut self) {
        self.menu = CategoryPath::root();
    }

    /// Close the menu and clear the dropdown selection.
    pub fn clear(&mut self) {
        self.menu = CategoryPath::root();
        self.selection = CategoryPath::root();
    }
}
