//! Off-thread price requests.

use super::cache::OfferCache;
use crate::client::CatalogBackend;
use crate::error::{PricingErrorKind, QuoteError, Result};
use crate::model::{Offer, PriceResponse, PricingContext, ProductId};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Result of one price request, as sent back by its worker.
#[derive(Debug)]
pub struct Completion {
    pub product_id: ProductId,
    /// Cache generation the request was issued under
    pub generation: u64,
    pub result: Result<PriceResponse>,
}

/// What happened when a completion was applied.
#[derive(Debug)]
pub enum Applied {
    /// An offer was written to the cache (possibly out of stock).
    Stored(ProductId),
    /// The request failed; the cache is untouched for this product.
    Failed {
        product_id: ProductId,
        error: QuoteError,
    },
    /// Issued under an older pricing context; discarded.
    Stale(ProductId),
}

impl Applied {
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::Stored(id) | Self::Stale(id) => id,
            Self::Failed { product_id, .. } => product_id,
        }
    }
}

/// Counters over the lifetime of a fetcher.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchStats {
    pub requests_issued: usize,
    pub offers_stored: usize,
    /// Of the stored offers, how many were out of stock
    pub out_of_stock: usize,
    pub failures: usize,
    pub stale_discarded: usize,
}

impl FetchStats {
    #[must_use]
    pub const fn completions(&self) -> usize {
        self.offers_stored + self.failures + self.stale_discarded
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Price requests: {} issued, {} stored ({} out of stock), {} failed, {} stale",
            self.requests_issued,
            self.offers_stored,
            self.out_of_stock,
            self.failures,
            self.stale_discarded
        );
    }
}

/// Issues price requests on worker threads and applies their completions.
///
/// Requests are never de-duplicated: asking twice for the same product
/// sends two requests, and whichever completion is applied last wins.
pub struct OfferFetcher {
    backend: Arc<dyn CatalogBackend>,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
    pending: HashMap<ProductId, usize>,
    stats: FetchStats,
}

impl OfferFetcher {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            tx,
            rx,
            pending: HashMap::new(),
            stats: FetchStats::default(),
        }
    }

    /// Start one price request for `product_id`. Returns immediately.
    pub fn request(&mut self, product_id: ProductId, context: &PricingContext, generation: u64) {
        tracing::debug!("Requesting price for {product_id} (generation {generation})");
        *self.pending.entry(product_id.clone()).or_insert(0) += 1;
        self.stats.requests_issued += 1;

        let backend = Arc::clone(&self.backend);
        let context = context.clone();
        let tx = self.tx.clone();

        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                backend.get_price(&product_id, &context)
            }))
            .unwrap_or_else(|_| {
                Err(QuoteError::pricing(
                    format!("product {product_id}"),
                    PricingErrorKind::WorkerGone,
                ))
            });
            // The receiver only goes away with the fetcher itself.
            let _ = tx.send(Completion {
                product_id,
                generation,
                result,
            });
        });
    }

    /// Whether any request for `product_id` is still outstanding.
    #[must_use]
    pub fn is_pending(&self, product_id: &ProductId) -> bool {
        self.pending.contains_key(product_id)
    }

    /// Total outstanding requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.values().sum()
    }

    #[must_use]
    pub const fn stats(&self) -> &FetchStats {
        &self.stats
    }

    /// Apply every completion that has already arrived. Never blocks.
    pub fn drain(&mut self, cache: &mut OfferCache) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            applied.push(self.apply(completion, cache));
        }
        applied
    }

    /// Block up to `timeout` for the next completion and apply it.
    ///
    /// Returns `None` on timeout or when nothing is outstanding.
    pub fn wait_next(&mut self, cache: &mut OfferCache, timeout: Duration) -> Option<Applied> {
        if self.pending.is_empty() {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(self.apply(completion, cache)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn settle(&mut self, product_id: &ProductId) {
        if let Some(count) = self.pending.get_mut(product_id) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(product_id);
            }
        }
    }

    fn apply(&mut self, completion: Completion, cache: &mut OfferCache) -> Applied {
        let Completion {
            product_id,
            generation,
            result,
        } = completion;
        self.settle(&product_id);

        if generation != cache.generation() {
            tracing::warn!(
                "Discarding stale price for {product_id} (generation {generation}, current {})",
                cache.generation()
            );
            self.stats.stale_discarded += 1;
            return Applied::Stale(product_id);
        }

        let decoded = result.and_then(|response| {
            Offer::from_response(product_id.clone(), response)
                .map_err(|kind| QuoteError::pricing(format!("product {product_id}"), kind))
        });

        match decoded {
            Ok(offer) => {
                if offer.is_out_of_stock() {
                    tracing::debug!("Product {product_id} is out of stock");
                    self.stats.out_of_stock += 1;
                } else {
                    tracing::debug!("Stored price for {product_id}");
                }
                self.stats.offers_stored += 1;
                cache.insert(offer);
                Applied::Stored(product_id)
            }
            Err(error) => {
                tracing::warn!("Price request for {product_id} failed: {error}");
                self.stats.failures += 1;
                Applied::Failed { product_id, error }
            }
        }
    }
}
