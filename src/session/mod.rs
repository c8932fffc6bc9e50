//! Browse session: one owner for all catalog, view and offer state.
//!
//! A [`BrowseSession`] is driven from a single control thread. Backend
//! calls run on worker threads; their results are applied only when the
//! control thread calls [`BrowseSession::poll`] (or one of the waiting
//! helpers), so state never changes underneath a caller holding a
//! [`PageView`].

mod loader;

use crate::banner::{Banner, BannerMessage};
use crate::catalog::{
    apply_filters, build_page, total_pages, Advance, CatalogStore, CategoryNavigator, PageView,
    SortField, SortOrder, ViewState,
};
use crate::client::CatalogBackend;
use crate::model::{CategoryNode, CategoryPath, Offer, PricingContext, ProductId};
use crate::pricing::{Applied, FetchStats, OfferCache, OfferFetcher};
use chrono::{DateTime, Utc};
use loader::{CatalogLoader, CatalogReply};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WAIT_SLICE: Duration = Duration::from_millis(25);

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Per-session settings.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub page_size: usize,
    pub sort: SortOrder,
    /// Hide the error banner after this long; `None` keeps it until replaced
    pub banner_auto_clear: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortOrder::default(),
            banner_auto_clear: None,
        }
    }
}

/// Something that changed while applying backend results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CategoriesLoaded,
    ProductsLoaded { count: usize },
    /// A product list for a query that has since been replaced
    ProductsSuperseded,
    CatalogFailed,
    OfferStored(ProductId),
    OfferFailed {
        product_id: ProductId,
        message: String,
    },
    /// A price issued under an earlier pricing context
    OfferDiscarded(ProductId),
}

/// What a surface should show in the offer column of one product row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OfferCell<'a> {
    NotFetched,
    /// A request is in flight; the previous offer, if any, is still valid
    Pending(Option<&'a Offer>),
    Quoted(&'a Offer),
    OutOfStock(&'a Offer),
}

/// Catalog browsing and price quoting state.
pub struct BrowseSession {
    store: CatalogStore,
    view: ViewState,
    navigator: CategoryNavigator,
    cache: OfferCache,
    fetcher: OfferFetcher,
    loader: CatalogLoader,
    context: PricingContext,
    banner: Banner,
    page_size: usize,
}

impl BrowseSession {
    pub fn new(
        backend: Arc<dyn CatalogBackend>,
        context: PricingContext,
        options: SessionOptions,
    ) -> Self {
        let banner = options
            .banner_auto_clear
            .map_or_else(Banner::new, Banner::with_auto_clear);
        Self {
            store: CatalogStore::new(),
            view: ViewState::new(options.sort),
            navigator: CategoryNavigator::new(),
            cache: OfferCache::new(),
            fetcher: OfferFetcher::new(Arc::clone(&backend)),
            loader: CatalogLoader::new(backend),
            context,
            banner,
            page_size: options.page_size,
        }
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Start loading the category tree.
    pub fn load_categories(&mut self) {
        self.loader.request_tree();
    }

    /// Start re-fetching the product list for the current view.
    pub fn refresh_products(&mut self) {
        self.banner.clear();
        let _ = self.loader.request_products(self.view.product_query());
    }

    /// Whether a catalog request is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    #[must_use]
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }

    #[must_use]
    pub const fn tree(&self) -> &CategoryNode {
        self.store.tree()
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    fn transition(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        let previous = std::mem::take(&mut self.view);
        let next = f(previous.clone());
        let refetch = next.needs_refetch(&previous);
        self.view = next;
        if refetch {
            self.refresh_products();
        }
    }

    /// Server-side search; re-fetches when the effective term changes.
    pub fn set_search_term(&mut self, term: &str) {
        self.transition(|v| v.with_search_term(term));
    }

    pub fn set_name_filter(&mut self, filter: &str) {
        self.transition(|v| v.with_name_filter(filter));
    }

    pub fn set_id_filter(&mut self, filter: &str) {
        self.transition(|v| v.with_id_filter(filter));
    }

    /// Column-header click: same field flips, new field sorts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        self.transition(|v| v.with_sort_toggled(field));
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.transition(|v| v.with_sort(sort));
    }

    /// Total pages of the filtered product list.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        let filtered = apply_filters(
            self.store.products(),
            &self.view.name_filter,
            &self.view.id_filter,
        );
        total_pages(filtered.len(), self.page_size)
    }

    /// Jump to `page`, clamped into the valid range.
    pub fn goto_page(&mut self, page: usize) {
        let total = self.total_pages();
        self.transition(|v| v.with_page(page).clamped(total));
    }

    pub fn next_page(&mut self) {
        self.goto_page(self.view.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.goto_page(self.view.page.saturating_sub(1));
    }

    /// The page to display right now.
    #[must_use]
    pub fn current_page(&self) -> PageView<'_> {
        build_page(self.store.products(), &self.view, self.page_size)
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Path of the drill-down submenu currently open.
    #[must_use]
    pub const fn menu_path(&self) -> &CategoryPath {
        self.navigator.menu_path()
    }

    /// Options of the drill-down submenu currently open.
    #[must_use]
    pub fn menu_options(&self) -> &[CategoryNode] {
        self.navigator.options(self.store.tree())
    }

    /// Choice sets for a dropdown-per-level surface over the selected path.
    ///
    /// The selection survives a commit, so after filtering by a leaf every
    /// level down to it is still listed and can be re-picked.
    #[must_use]
    pub fn dropdown_levels(&self) -> Vec<&[CategoryNode]> {
        self.navigator.levels(self.store.tree())
    }

    /// Path the dropdowns currently show.
    #[must_use]
    pub const fn dropdown_path(&self) -> &CategoryPath {
        self.navigator.selection()
    }

    fn commit(&mut self, outcome: &Advance) {
        if let Advance::Committed(path) = outcome {
            tracing::info!("Category filter set to {path}");
            let path = path.clone();
            self.transition(|v| v.with_category(path));
        }
    }

    /// Pick `name` in the open submenu. Committing a leaf filters the list.
    pub fn choose_category(&mut self, name: &str) -> Advance {
        let outcome = self.navigator.choose(self.store.tree(), name);
        self.commit(&outcome);
        outcome
    }

    /// Set dropdown `depth` to `name`, dropping any deeper choice.
    pub fn select_category_level(&mut self, depth: usize, name: &str) -> Advance {
        let outcome = self
            .navigator
            .select_at_level(self.store.tree(), depth, name);
        self.commit(&outcome);
        outcome
    }

    pub fn menu_back(&mut self) {
        self.navigator.back();
    }

    pub fn menu_reset(&mut self) {
        self.navigator.reset();
    }

    /// Filter by `path` directly, without going through the menu.
    ///
    /// The path is not checked against the tree; an unknown path simply
    /// matches nothing on the backend.
    pub fn set_category(&mut self, path: CategoryPath) {
        self.navigator.set_selection(path.clone());
        self.transition(|v| v.with_category(path));
    }

    /// Drop the category filter, close the menu and clear the dropdowns.
    pub fn clear_category(&mut self) {
        self.navigator.clear();
        self.transition(|v| v.with_category(CategoryPath::root()));
    }

    // ------------------------------------------------------------------
    // Offers
    // ------------------------------------------------------------------

    /// Ask for a fresh price for one product. Returns immediately.
    pub fn request_offer(&mut self, product_id: ProductId) {
        self.banner.clear();
        self.fetcher
            .request(product_id, &self.context, self.cache.generation());
    }

    #[must_use]
    pub fn is_offer_pending(&self, product_id: &ProductId) -> bool {
        self.fetcher.is_pending(product_id)
    }

    #[must_use]
    pub fn offer(&self, product_id: &ProductId) -> Option<&Offer> {
        self.cache.get(product_id)
    }

    #[must_use]
    pub fn offer_cell(&self, product_id: &ProductId) -> OfferCell<'_> {
        let cached = self.cache.get(product_id);
        if self.fetcher.is_pending(product_id) {
            return OfferCell::Pending(cached);
        }
        match cached {
            Some(offer) if offer.is_out_of_stock() => OfferCell::OutOfStock(offer),
            Some(offer) => OfferCell::Quoted(offer),
            None => OfferCell::NotFetched,
        }
    }

    /// Minutes left on the cached offer for `product_id` at `now`.
    #[must_use]
    pub fn minutes_remaining(&self, product_id: &ProductId, now: DateTime<Utc>) -> Option<u64> {
        self.cache
            .get(product_id)
            .and_then(|offer| offer.minutes_remaining(now))
    }

    #[must_use]
    pub const fn pricing_context(&self) -> &PricingContext {
        &self.context
    }

    /// Switch pricing context. Every cached offer is dropped before this
    /// returns, and answers to requests issued earlier are discarded.
    pub fn set_pricing_context(&mut self, context: PricingContext) {
        tracing::info!("Pricing context changed: {} -> {context}", self.context);
        self.context = context;
        let generation = self.cache.invalidate();
        tracing::debug!("Offer cache cleared (generation {generation})");
    }

    #[must_use]
    pub const fn offers(&self) -> &OfferCache {
        &self.cache
    }

    #[must_use]
    pub const fn fetch_stats(&self) -> &FetchStats {
        self.fetcher.stats()
    }

    // ------------------------------------------------------------------
    // Banner and completions
    // ------------------------------------------------------------------

    /// Current error banner, if it has not auto-cleared.
    pub fn banner(&mut self) -> Option<&BannerMessage> {
        self.banner.current()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner.clear();
    }

    /// Nothing outstanding: no catalog load, no price request.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.loader.is_loading() && self.fetcher.pending_count() == 0
    }

    fn apply_catalog(&mut self, reply: CatalogReply) -> SessionEvent {
        match reply {
            CatalogReply::Tree(Ok(tree)) => {
                tracing::info!(
                    "Loaded category tree: {} categories, depth {}",
                    tree.descendant_count(),
                    tree.depth()
                );
                self.store.set_tree(tree);
                SessionEvent::CategoriesLoaded
            }
            CatalogReply::Products { seq, query, result } if !self.loader.is_current(seq) => {
                tracing::debug!(
                    "Dropping product list for superseded query [{}] ({})",
                    query.to_query_string(),
                    if result.is_ok() { "ok" } else { "failed" }
                );
                SessionEvent::ProductsSuperseded
            }
            CatalogReply::Products {
                result: Ok(products),
                ..
            } => {
                let count = products.len();
                tracing::info!("Loaded {count} products");
                self.store.replace_products(products);
                let total = self.total_pages();
                self.view = std::mem::take(&mut self.view).clamped(total);
                SessionEvent::ProductsLoaded { count }
            }
            CatalogReply::Tree(Err(error)) | CatalogReply::Products { result: Err(error), .. } => {
                tracing::warn!("Catalog request failed: {error}");
                self.banner.report(&error);
                SessionEvent::CatalogFailed
            }
        }
    }

    fn apply_offer(&mut self, applied: Applied) -> SessionEvent {
        match applied {
            Applied::Stored(id) => SessionEvent::OfferStored(id),
            Applied::Stale(id) => SessionEvent::OfferDiscarded(id),
            Applied::Failed { product_id, error } => {
                self.banner.report(&error);
                let message = self
                    .banner
                    .peek()
                    .map_or_else(|| error.to_string(), |b| b.text.clone());
                SessionEvent::OfferFailed {
                    product_id,
                    message,
                }
            }
        }
    }

    /// Apply every result that has arrived. Never blocks.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(reply) = self.loader.try_next() {
            events.push(self.apply_catalog(reply));
        }
        for applied in self.fetcher.drain(&mut self.cache) {
            events.push(self.apply_offer(applied));
        }
        events
    }

    /// Block until nothing is outstanding or `timeout` passes, applying
    /// results as they arrive. Meant for line-oriented front ends.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<SessionEvent> {
        self.wait_until(timeout, Self::is_idle)
    }

    /// Like [`Self::wait_idle`], but only waits for catalog loads.
    pub fn wait_catalog(&mut self, timeout: Duration) -> Vec<SessionEvent> {
        self.wait_until(timeout, |s| !s.is_loading())
    }

    fn wait_until(&mut self, timeout: Duration, done: impl Fn(&Self) -> bool) -> Vec<SessionEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();

        while !done(self) {
            let now = Instant::now();
            if now >= deadline {
                tracing::warn!("Gave up waiting after {timeout:?}");
                break;
            }
            let slice = (deadline - now).min(WAIT_SLICE);
            if self.loader.is_loading() {
                if let Some(reply) = self.loader.next_timeout(slice) {
                    events.push(self.apply_catalog(reply));
                }
            } else if let Some(applied) = self.fetcher.wait_next(&mut self.cache, slice) {
                events.push(self.apply_offer(applied));
            }
            events.extend(self.poll());
        }
        events
    }
}
