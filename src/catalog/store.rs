//! Last-fetched catalog data.

use crate::model::{CategoryNode, Product};

/// Holds the most recent product list and the category tree.
///
/// No logic lives here: the product list is swapped out wholesale on every
/// re-fetch and the tree is set once per session.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    tree: CategoryNode,
    tree_loaded: bool,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole product list.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Install the category tree.
    pub fn set_tree(&mut self, tree: CategoryNode) {
        self.tree = tree;
        self.tree_loaded = true;
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn tree(&self) -> &CategoryNode {
        &self.tree
    }

    #[must_use]
    pub const fn has_tree(&self) -> bool {
        self.tree_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = CatalogStore::new();
        store.replace_products(vec![Product::new(1, "a"), Product::new(2, "b")]);
        store.replace_products(vec![Product::new(3, "c")]);
        assert_eq!(store.products(), &[Product::new(3, "c")]);
    }

    #[test]
    fn test_tree_flag() {
        let mut store = CatalogStore::new();
        assert!(!store.has_tree());
        store.set_tree(CategoryNode::root(vec![]));
        assert!(store.has_tree());
    }
}
