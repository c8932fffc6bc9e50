//! Catalog backend access.
//!
//! [`CatalogBackend`] is the seam between the state engine and the network.
//! The HTTP implementation needs the `http` feature; [`StaticBackend`]
//! serves a fixed catalog from memory or from a JSON fixture file.
//!
//! # Example
//!
//! ```ignore
//! use parts_quote::client::{CatalogBackend, HttpBackend, HttpBackendConfig};
//! use parts_quote::catalog::ProductQuery;
//!
//! let backend = HttpBackend::new(HttpBackendConfig::default())?;
//! let tree = backend.list_categories()?;
//! let products = backend.list_products(&ProductQuery::all())?;
//! ```

#[cfg(feature = "http")]
mod http;
mod memory;

#[cfg(feature = "http")]
pub use http::{HttpBackend, HttpBackendConfig};
pub use memory::{CatalogFixture, FixtureProduct, StaticBackend};

use crate::catalog::ProductQuery;
use crate::error::Result;
use crate::model::{CategoryNode, PriceResponse, PricingContext, Product, ProductId};

/// Read-only access to the catalog backend.
///
/// Implementations are called from worker threads for price requests, so
/// they must be shareable across threads. Each call is exactly one request;
/// retrying is left to the user.
pub trait CatalogBackend: Send + Sync {
    /// Fetch the category tree, normalized to an unnamed root.
    fn list_categories(&self) -> Result<CategoryNode>;

    /// Fetch the products matching the server-side part of a query.
    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    /// Fetch the raw price answer for one product under a pricing context.
    ///
    /// An out-of-stock answer is an `Ok` response carrying the marker.
    fn get_price(&self, product_id: &ProductId, context: &PricingContext) -> Result<PriceResponse>;

    /// Short name for logs (e.g., "http", "static").
    fn name(&self) -> &'static str;
}
