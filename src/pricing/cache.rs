//! Offer cache keyed by product id.

use crate::model::{Offer, ProductId};
use std::collections::HashMap;

/// Latest offer per product under the current pricing context.
///
/// The generation counter goes up on every [`OfferCache::invalidate`];
/// writers compare it against the generation their request was issued
/// under.
#[derive(Debug, Clone, Default)]
pub struct OfferCache {
    offers: HashMap<ProductId, Offer>,
    generation: u64,
}

impl OfferCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&Offer> {
        self.offers.get(product_id)
    }

    /// Store an offer, replacing any earlier one for the same product.
    pub fn insert(&mut self, offer: Offer) {
        self.offers.insert(offer.product_id().clone(), offer);
    }

    /// Drop every offer and start a new generation.
    pub fn invalidate(&mut self) -> u64 {
        self.offers.clear();
        self.generation += 1;
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, &Offer)> {
        self.offers.iter()
    }
}
