//! Price offer retrieval.
//!
//! Offers are requested one product at a time. Each request runs on its own
//! worker thread and reports back through a channel; the owning thread
//! applies completions to the [`OfferCache`] when it drains them. Every
//! request is tagged with the cache generation current at issue time, and a
//! completion from an older generation is dropped instead of written.

mod cache;
mod expiry;
mod fetcher;

pub use cache::OfferCache;
pub use expiry::{minutes_remaining, minutes_until};
pub use fetcher::{Applied, Completion, FetchStats, OfferFetcher};
