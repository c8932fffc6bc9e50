//! View state and its transitions.
//!
//! Every transition consumes the state and returns the next one; nothing is
//! mutated in place. Changing any filter, the search term or the category
//! resets the page to 1. Page clamping needs the size of the filtered list
//! and happens in [`ViewState::clamped`] or when a page is built.

use super::pipeline::{clamp_page, SortField, SortOrder};
use super::query::ProductQuery;
use crate::model::CategoryPath;

/// Everything the user has chosen about what the product list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// 1-based page
    pub page: usize,
    pub sort: SortOrder,
    /// Local name substring filter
    pub name_filter: String,
    /// Local id substring filter
    pub id_filter: String,
    /// Server-side free-text search
    pub search_term: String,
    /// Committed category filter (server-side)
    pub category: CategoryPath,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}

impl ViewState {
    #[must_use]
    pub const fn new(sort: SortOrder) -> Self {
        Self {
            page: 1,
            sort,
            name_filter: String::new(),
            id_filter: String::new(),
            search_term: String::new(),
            category: CategoryPath::root(),
        }
    }

    #[must_use]
    pub fn with_name_filter(self, filter: impl Into<String>) -> Self {
        Self {
            name_filter: filter.into(),
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_id_filter(self, filter: impl Into<String>) -> Self {
        Self {
            id_filter: filter.into(),
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_search_term(self, term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_category(self, category: CategoryPath) -> Self {
        Self {
            category,
            page: 1,
            ..self
        }
    }

    /// Clicking a column header.
    #[must_use]
    pub fn with_sort_toggled(self, field: SortField) -> Self {
        Self {
            sort: self.sort.toggled(field),
            ..self
        }
    }

    #[must_use]
    pub fn with_sort(self, sort: SortOrder) -> Self {
        Self { sort, ..self }
    }

    /// Request a page; the value is clamped once the list size is known.
    #[must_use]
    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Clamp the page into `[1, max(1, total_pages)]`.
    #[must_use]
    pub fn clamped(self, total_pages: usize) -> Self {
        Self {
            page: clamp_page(self.page, total_pages),
            ..self
        }
    }

    /// Request the backend has to answer for this state.
    #[must_use]
    pub fn product_query(&self) -> ProductQuery {
        ProductQuery::new(&self.search_term, self.category.clone())
    }

    /// Whether moving from `previous` to `self` needs a catalog re-fetch.
    #[must_use]
    pub fn needs_refetch(&self, previous: &Self) -> bool {
        self.product_query() != previous.product_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pipeline::SortDirection;

    #[test]
    fn test_default_starts_on_page_one() {
        let view = ViewState::default();
        assert_eq!(view.page, 1);
        assert_eq!(view.sort.field, SortField::Name);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let view = ViewState::default().with_page(3);
        assert_eq!(view.clone().with_name_filter("akku").page, 1);
        assert_eq!(view.clone().with_id_filter("12").page, 1);
        assert_eq!(view.clone().with_search_term("iphone").page, 1);
        assert_eq!(
            view.with_category(CategoryPath::from_segments(["Phones"])).page,
            1
        );
    }

    #[test]
    fn test_sort_keeps_page() {
        let view = ViewState::default().with_page(2).with_sort_toggled(SortField::Name);
        assert_eq!(view.page, 2);
        assert_eq!(view.sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(ViewState::default().with_page(4).clamped(3).page, 3);
        assert_eq!(ViewState::default().with_page(4).clamped(0).page, 1);
        assert_eq!(ViewState::default().with_page(0).page, 1);
    }

    #[test]
    fn test_needs_refetch_only_for_server_side_inputs() {
        let base = ViewState::default();
        assert!(!base.clone().with_name_filter("x").needs_refetch(&base));
        assert!(!base.clone().with_id_filter("x").needs_refetch(&base));
        assert!(base.clone().with_search_term("x").needs_refetch(&base));
        assert!(base
            .clone()
            .with_category(CategoryPath::from_segments(["Tools"]))
            .needs_refetch(&base));
        // whitespace-only search is the same query as no search
        assert!(!base.clone().with_search_term("  ").needs_refetch(&base));
    }
}
