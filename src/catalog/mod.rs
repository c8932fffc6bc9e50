//! Catalog browsing: the store, category navigation, and the
//! filter → sort → paginate pipeline.
//!
//! All derived views are pure functions over explicit snapshots
//! ([`CatalogStore`], [`ViewState`]) and are recomputed when asked for.

pub mod navigator;
pub mod pipeline;
mod query;
mod store;
mod view;

pub use navigator::{
    advance, children_at, level_options, resolve, retreat, select_at_level, Advance,
    CategoryNavigator,
};
pub use pipeline::{
    apply_filters, build_page, clamp_page, filtered_sorted, paginate, sort_products, total_pages,
    PageView, SortDirection, SortField, SortOrder,
};
pub use query::ProductQuery;
pub use store::CatalogStore;
pub use view::ViewState;
