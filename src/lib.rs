//! **Catalog browsing and live price quoting for phone-repair parts.**
//!
//! `parts-quote` is the state engine behind a parts shop front end: it walks
//! a category tree of any depth, runs the product list through a
//! filter → sort → paginate pipeline, and fetches per-product price offers
//! off the control thread, tracking how long each quoted price stays valid.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: products, the category tree and paths into it, price
//!   responses and the [`Offer`] variants they decode into.
//! - **[`catalog`]**: tree navigation ([`catalog::children_at`],
//!   [`catalog::advance`], [`catalog::retreat`]), the product pipeline and
//!   the immutable [`catalog::ViewState`].
//! - **[`pricing`]**: the [`OfferCache`], the threaded [`OfferFetcher`] and
//!   expiry arithmetic.
//! - **[`client`]**: the [`CatalogBackend`] trait with an HTTP
//!   implementation (`http` feature) and an in-memory one.
//! - **[`session`]**: [`BrowseSession`], which owns all of the above for
//!   one user and applies backend results on the caller's thread.
//! - **[`reports`]**: text and JSON rendering.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use parts_quote::{BrowseSession, PricingContext, SessionOptions, StaticBackend};
//!
//! let backend = StaticBackend::from_fixture_file("catalog.json".as_ref())?;
//! let mut session = BrowseSession::new(
//!     Arc::new(backend),
//!     PricingContext::public(),
//!     SessionOptions::default(),
//! );
//!
//! session.load_categories();
//! session.refresh_products();
//! session.wait_catalog(Duration::from_secs(30));
//!
//! session.choose_category("Phones");
//! session.choose_category("iPhone");
//! session.wait_catalog(Duration::from_secs(30));
//!
//! for product in session.current_page().items {
//!     println!("{} {}", product.id, product.name);
//! }
//! # Ok::<(), parts_quote::QuoteError>(())
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    // Prices are displayed, never summed
    clippy::float_cmp
)]

pub mod banner;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pricing;
pub mod reports;
pub mod session;

// Re-export main types for convenience
pub use banner::{Banner, BannerMessage, BannerSource};
pub use catalog::{Advance, CategoryNavigator, PageView, SortDirection, SortField, SortOrder, ViewState};
#[cfg(feature = "http")]
pub use client::{HttpBackend, HttpBackendConfig};
pub use client::{CatalogBackend, StaticBackend};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{ErrorContext, OptionContext, QuoteError, Result};
pub use model::{
    CategoryNode, CategoryPath, Offer, PriceResponse, PricingContext, Product, ProductId,
    ProviderQuote, Quote,
};
pub use pricing::{minutes_remaining, OfferCache, OfferFetcher};
pub use session::{BrowseSession, OfferCell, SessionEvent, SessionOptions};
