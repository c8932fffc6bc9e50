//! Off-thread catalog requests.
//!
//! Works like the price fetcher, but only the newest product-list request
//! counts: a list that arrives after a newer query was issued is dropped.

use crate::catalog::ProductQuery;
use crate::client::CatalogBackend;
use crate::error::{CatalogErrorKind, QuoteError, Result};
use crate::model::{CategoryNode, Product};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn worker_gone(what: &str) -> QuoteError {
    QuoteError::catalog(what, CatalogErrorKind::WorkerGone)
}

#[derive(Debug)]
pub(crate) enum CatalogReply {
    Tree(Result<CategoryNode>),
    Products {
        seq: u64,
        query: ProductQuery,
        result: Result<Vec<Product>>,
    },
}

pub(crate) struct CatalogLoader {
    backend: Arc<dyn CatalogBackend>,
    tx: mpsc::Sender<CatalogReply>,
    rx: mpsc::Receiver<CatalogReply>,
    tree_pending: bool,
    products_pending: usize,
    latest_seq: u64,
}

impl CatalogLoader {
    pub(crate) fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            tx,
            rx,
            tree_pending: false,
            products_pending: 0,
            latest_seq: 0,
        }
    }

    pub(crate) fn request_tree(&mut self) {
        tracing::debug!("Requesting category tree from {} backend", self.backend.name());
        self.tree_pending = true;
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| backend.list_categories()))
                .unwrap_or_else(|_| Err(worker_gone("listing categories")));
            let _ = tx.send(CatalogReply::Tree(result));
        });
    }

    pub(crate) fn request_products(&mut self, query: ProductQuery) -> u64 {
        self.latest_seq += 1;
        self.products_pending += 1;
        let seq = self.latest_seq;
        tracing::debug!("Requesting products [{}] (#{seq})", query.to_query_string());

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| backend.list_products(&query)))
                .unwrap_or_else(|_| Err(worker_gone("listing products")));
            let _ = tx.send(CatalogReply::Products { seq, query, result });
        });
        seq
    }

    pub(crate) const fn is_loading(&self) -> bool {
        self.tree_pending || self.products_pending > 0
    }

    /// Whether `seq` is still the newest product request.
    pub(crate) const fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    pub(crate) fn try_next(&mut self) -> Option<CatalogReply> {
        let reply = self.rx.try_recv().ok()?;
        self.settle(&reply);
        Some(reply)
    }

    pub(crate) fn next_timeout(&mut self, timeout: Duration) -> Option<CatalogReply> {
        let reply = self.rx.recv_timeout(timeout).ok()?;
        self.settle(&reply);
        Some(reply)
    }

    fn settle(&mut self, reply: &CatalogReply) {
        match reply {
            CatalogReply::Tree(_) => self.tree_pending = false,
            CatalogReply::Products { .. } => {
                self.products_pending = self.products_pending.saturating_sub(1);
            }
        }
    }
}
