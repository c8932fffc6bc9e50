//! Filter → sort → paginate over the fetched product list.
//!
//! Category and search term are server-side query parameters; the name and
//! id substring filters here are local refinements on top of whatever the
//! backend returned.

use super::view::ViewState;
use crate::model::{Product, ProductId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column the product list is sorted by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Id,
}

impl SortField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[value(alias = "asc")]
    Ascending,
    #[value(alias = "desc")]
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Arrow shown next to the sorted column header.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Sort field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Clicking a column: same field flips direction, a new field starts ascending.
    #[must_use]
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Ascending)
        }
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Products whose name contains `name_filter` and whose id contains
/// `id_filter`, both case-insensitively. Input order is kept.
#[must_use]
pub fn apply_filters<'a>(
    products: &'a [Product],
    name_filter: &str,
    id_filter: &str,
) -> Vec<&'a Product> {
    let name_lower = name_filter.to_lowercase();
    let id_lower = id_filter.to_lowercase();

    products
        .iter()
        .filter(|p| name_lower.is_empty() || p.name.to_lowercase().contains(&name_lower))
        .filter(|p| id_lower.is_empty() || p.id.to_lowercase().contains(&id_lower))
        .collect()
}

// ============================================================================
// Sorting
// ============================================================================

/// Numbers compare numerically, text case-insensitively, and numeric ids
/// sort before text ids.
fn compare_ids(a: &ProductId, b: &ProductId) -> Ordering {
    match (a, b) {
        (ProductId::Number(x), ProductId::Number(y)) => x.cmp(y),
        (ProductId::Text(x), ProductId::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (ProductId::Number(_), ProductId::Text(_)) => Ordering::Less,
        (ProductId::Text(_), ProductId::Number(_)) => Ordering::Greater,
    }
}

fn compare_by(field: SortField, a: &Product, b: &Product) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Id => compare_ids(&a.id, &b.id),
    }
}

/// Stable sort: equal keys keep their input order in either direction.
pub fn sort_products(items: &mut [&Product], order: SortOrder) {
    items.sort_by(|a, b| {
        let ord = compare_by(order.field, a, b);
        match order.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

// ============================================================================
// Pagination
// ============================================================================

/// `ceil(count / page_size)`; zero for an empty list or a zero page size.
#[must_use]
pub const fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Clamp a 1-based page number into `[1, max(1, total_pages)]`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Items `[(page-1)*page_size, page*page_size)`; empty past the end.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// One page of the filtered, sorted product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub items: Vec<&'a Product>,
    /// 1-based page actually shown, after clamping
    pub page: usize,
    pub total_pages: usize,
    /// Products left after filtering, across all pages
    pub total_items: usize,
}

impl PageView<'_> {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filtered and sorted products for `view`, without paging.
#[must_use]
pub fn filtered_sorted<'a>(products: &'a [Product], view: &ViewState) -> Vec<&'a Product> {
    let mut items = apply_filters(products, &view.name_filter, &view.id_filter);
    sort_products(&mut items, view.sort);
    items
}

/// Run the whole pipeline for one snapshot of the view state.
#[must_use]
pub fn build_page<'a>(products: &'a [Product], view: &ViewState, page_size: usize) -> PageView<'a> {
    let items = filtered_sorted(products, view);
    let total_items = items.len();
    let total = total_pages(total_items, page_size);
    let page = clamp_page(view.page, total);

    PageView {
        items: paginate(&items, page, page_size).to_vec(),
        page,
        total_pages: total,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(12, "iPhone 12 Display"),
            Product::new(3, "akku Galaxy S21"),
            Product::new("SM-100", "Back Cover"),
            Product::new(120, "iphone 12 Akku"),
            Product::new(7, "Akku Galaxy S21"),
        ]
    }

    fn ids(items: &[&Product]) -> Vec<String> {
        items.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_filters_are_case_insensitive_and_combined() {
        let products = catalog();
        let hits = apply_filters(&products, "AKKU", "");
        assert_eq!(ids(&hits), ["3", "120", "7"]);

        let hits = apply_filters(&products, "akku", "12");
        assert_eq!(ids(&hits), ["120"]);

        let hits = apply_filters(&products, "", "sm-");
        assert_eq!(ids(&hits), ["SM-100"]);
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let products = catalog();
        assert_eq!(apply_filters(&products, "", "").len(), products.len());
    }

    #[test]
    fn test_sort_by_name_is_stable() {
        let products = catalog();
        let mut items: Vec<&Product> = products.iter().collect();
        sort_products(&mut items, SortOrder::new(SortField::Name, SortDirection::Ascending));
        // "akku Galaxy S21" and "Akku Galaxy S21" tie; input order wins
        assert_eq!(ids(&items), ["3", "7", "SM-100", "120", "12"]);

        sort_products(&mut items, SortOrder::new(SortField::Name, SortDirection::Descending));
        assert_eq!(ids(&items), ["12", "120", "SM-100", "3", "7"]);
    }

    #[test]
    fn test_sort_by_id_numbers_then_text() {
        let products = catalog();
        let mut items: Vec<&Product> = products.iter().collect();
        sort_products(&mut items, SortOrder::new(SortField::Id, SortDirection::Ascending));
        assert_eq!(ids(&items), ["3", "7", "12", "120", "SM-100"]);
    }

    #[test]
    fn test_sort_toggle() {
        let order = SortOrder::default();
        assert_eq!(order.field, SortField::Name);
        assert_eq!(order.direction, SortDirection::Ascending);

        let flipped = order.toggled(SortField::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let other = flipped.toggled(SortField::Id);
        assert_eq!(other, SortOrder::new(SortField::Id, SortDirection::Ascending));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(4, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 0), 1);
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 3, 10), &[21, 22, 23]);
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn test_build_page_clamps() {
        let products: Vec<Product> = (1..=23).map(|i| Product::new(i, format!("part {i:02}"))).collect();
        let view = ViewState::default().with_page(4);
        let page = build_page(&products, &view, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 3);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_build_page_empty_result() {
        let products = catalog();
        let view = ViewState::default().with_name_filter("no such part");
        let page = build_page(&products, &view, 10);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }
}
