//! In-memory catalog backend.
//!
//! Serves a fixed tree, product list and price table. Used for offline
//! browsing from a JSON fixture file and as the backend in tests, where the
//! price and catalog gates let a test hold responses back to provoke
//! out-of-order completions.

use super::CatalogBackend;
use crate::catalog::ProductQuery;
use crate::error::{CatalogErrorKind, ErrorContext, PricingErrorKind, QuoteError, Result};
use crate::model::{
    out_of_stock_message, CategoryNode, CategoryPayload, CategoryPath, PriceResponse,
    PricingContext, Product, ProductId,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A product together with the category path it is filed under.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: CategoryPath,
}

/// On-disk layout of an offline catalog.
///
/// ```json
/// {
///   "categories": [{"name": "Phones", "children": [{"name": "iPhone"}]}],
///   "products": [{"id": 1, "name": "iPhone 12 Display", "category": ["Phones", "iPhone"]}],
///   "prices": {"1": {"customer_price": 89.9, "provider": "foneday"}}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub categories: Option<CategoryPayload>,
    #[serde(default)]
    pub products: Vec<FixtureProduct>,
    /// Price answers keyed by product id as text
    #[serde(default)]
    pub prices: IndexMap<String, PriceResponse>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Closed gates block callers of [`Gate::pass`] until reopened.
#[derive(Default)]
struct Gate {
    closed: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    fn close(&self) {
        *lock(&self.closed) = true;
    }

    fn open(&self) {
        *lock(&self.closed) = false;
        self.opened.notify_all();
    }

    fn pass(&self) {
        let mut closed = lock(&self.closed);
        while *closed {
            closed = self
                .opened
                .wait(closed)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Backend answering from memory.
///
/// Products match a query when their category path starts with the query's
/// path and their name contains the search term (case-insensitive). A
/// product without a price entry answers out of stock, like the real
/// endpoint does.
#[derive(Default)]
pub struct StaticBackend {
    tree: CategoryNode,
    products: Vec<FixtureProduct>,
    prices: HashMap<ProductId, PriceResponse>,
    tier_prices: HashMap<(ProductId, String), PriceResponse>,
    failing_prices: HashSet<ProductId>,
    catalog_down: AtomicBool,
    price_gate: Gate,
    catalog_gate: Gate,
    queries: Mutex<Vec<ProductQuery>>,
    price_requests: Mutex<Vec<(ProductId, PricingContext)>>,
}

impl StaticBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a backend from a JSON fixture file.
    pub fn from_fixture_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| QuoteError::io(path, e))?;
        let fixture: CatalogFixture = serde_json::from_str(&raw)
            .with_context(|| format!("parsing fixture {}", path.display()))?;
        Ok(Self::from_fixture(fixture))
    }

    #[must_use]
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        let mut backend = Self::new();
        if let Some(payload) = fixture.categories {
            backend.tree = payload.into_root();
        }
        backend.products = fixture.products;
        for (id, response) in fixture.prices {
            backend.prices.insert(ProductId::parse(&id), response);
        }
        backend
    }

    #[must_use]
    pub fn with_tree(mut self, tree: CategoryNode) -> Self {
        self.tree = tree;
        self
    }

    #[must_use]
    pub fn with_product(mut self, category: CategoryPath, product: Product) -> Self {
        self.products.push(FixtureProduct {
            id: product.id,
            name: product.name,
            category,
        });
        self
    }

    /// Price answered for `id` under any pricing context.
    #[must_use]
    pub fn with_price(mut self, id: impl Into<ProductId>, response: PriceResponse) -> Self {
        self.prices.insert(id.into(), response);
        self
    }

    /// Price answered for `id` when the context carries `user_type`.
    #[must_use]
    pub fn with_tier_price(
        mut self,
        id: impl Into<ProductId>,
        user_type: impl Into<String>,
        response: PriceResponse,
    ) -> Self {
        self.tier_prices.insert((id.into(), user_type.into()), response);
        self
    }

    /// Price requests for `id` fail with a network error.
    #[must_use]
    pub fn with_failing_price(mut self, id: impl Into<ProductId>) -> Self {
        self.failing_prices.insert(id.into());
        self
    }

    /// Make catalog requests fail (or succeed again).
    pub fn set_catalog_down(&self, down: bool) {
        self.catalog_down.store(down, Ordering::SeqCst);
    }

    /// Block price answers until [`Self::release_prices`] is called.
    pub fn hold_prices(&self) {
        self.price_gate.close();
    }

    pub fn release_prices(&self) {
        self.price_gate.open();
    }

    /// Block product-list answers until [`Self::release_catalog`] is called.
    ///
    /// Queries are still recorded on arrival.
    pub fn hold_catalog(&self) {
        self.catalog_gate.close();
    }

    pub fn release_catalog(&self) {
        self.catalog_gate.open();
    }

    /// Product queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<ProductQuery> {
        lock(&self.queries).clone()
    }

    /// Price requests received so far, oldest first.
    #[must_use]
    pub fn price_requests(&self) -> Vec<(ProductId, PricingContext)> {
        lock(&self.price_requests).clone()
    }

    fn ensure_catalog_up(&self, what: &str) -> Result<()> {
        if self.catalog_down.load(Ordering::SeqCst) {
            return Err(QuoteError::catalog(
                what,
                CatalogErrorKind::NetworkError("backend unreachable".to_string()),
            ));
        }
        Ok(())
    }

    fn matches(product: &FixtureProduct, query: &ProductQuery) -> bool {
        let in_category = product
            .category
            .segments()
            .starts_with(query.category.segments());
        let term_ok = query.search_term.as_ref().map_or(true, |term| {
            product.name.to_lowercase().contains(&term.to_lowercase())
        });
        in_category && term_ok
    }
}

impl CatalogBackend for StaticBackend {
    fn list_categories(&self) -> Result<CategoryNode> {
        self.ensure_catalog_up("listing categories")?;
        Ok(self.tree.clone())
    }

    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        lock(&self.queries).push(query.clone());
        self.catalog_gate.pass();
        self.ensure_catalog_up("listing products")?;
        Ok(self
            .products
            .iter()
            .filter(|p| Self::matches(p, query))
            .map(|p| Product::new(p.id.clone(), p.name.clone()))
            .collect())
    }

    fn get_price(&self, product_id: &ProductId, context: &PricingContext) -> Result<PriceResponse> {
        lock(&self.price_requests).push((product_id.clone(), context.clone()));
        self.price_gate.pass();

        if self.failing_prices.contains(product_id) {
            return Err(QuoteError::pricing(
                format!("product {product_id}"),
                PricingErrorKind::NetworkError("connection reset".to_string()),
            ));
        }

        let tiered = context
            .user_type
            .as_ref()
            .and_then(|tier| self.tier_prices.get(&(product_id.clone(), tier.clone())));

        Ok(tiered
            .or_else(|| self.prices.get(product_id))
            .cloned()
            .unwrap_or_else(|| PriceResponse {
                error: Some(out_of_stock_message(product_id)),
                ..PriceResponse::default()
            }))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
