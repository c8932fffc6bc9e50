//! Price offers and the raw price response they are decoded from.

use super::product::ProductId;
use crate::error::PricingErrorKind;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix of the in-band message the price endpoint sends when no provider
/// has the part in stock. The full message ends with the product id.
pub const OUT_OF_STOCK_PREFIX: &str = "No provider cost found for product id ";

/// Out-of-stock message for one product, exactly as the backend words it.
#[must_use]
pub fn out_of_stock_message(product_id: &ProductId) -> String {
    format!("{OUT_OF_STOCK_PREFIX}{product_id}")
}

/// Whether `message` is exactly the out-of-stock answer for `product_id`.
#[must_use]
pub fn is_out_of_stock_message(message: &str, product_id: &ProductId) -> bool {
    message
        .strip_prefix(OUT_OF_STOCK_PREFIX)
        .is_some_and(|rest| rest == product_id.to_string())
}

// ============================================================================
// Wire format
// ============================================================================

/// Body of the price endpoint.
///
/// Every field is optional on the wire; which ones are present decides the
/// [`Offer`] variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    #[serde(default)]
    pub customer_price: Option<f64>,
    #[serde(default)]
    pub dealer_price: Option<f64>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub expire_time_ms: Option<i64>,
    #[serde(default)]
    pub all_providers: Option<IndexMap<String, ProviderQuote>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One provider's figures inside a multi-provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderQuote {
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub dealer_price: Option<f64>,
    #[serde(default)]
    pub customer_price: Option<f64>,
}

// ============================================================================
// Offer
// ============================================================================

/// The priced part of an offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub product_id: ProductId,
    pub customer_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_price: Option<f64>,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_at_ms: Option<i64>,
}

/// One price quote result for a single product.
///
/// Offers are only built from successful responses and never change after
/// that; a later fetch for the same product replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Offer {
    /// A single provider's price.
    Basic(Quote),
    /// The chosen price plus every provider's figures, in response order.
    WithAllProviders {
        #[serde(flatten)]
        quote: Quote,
        providers: IndexMap<String, ProviderQuote>,
    },
    /// No provider has the part.
    OutOfStock {
        product_id: ProductId,
        message: String,
    },
}

impl Offer {
    /// Decode a price response for `product_id`.
    ///
    /// An `error` field equal to the out-of-stock message for `product_id`
    /// yields [`Offer::OutOfStock`]; any other `error` text, including the
    /// marker for a different id, is a rejection.
    pub fn from_response(
        product_id: ProductId,
        response: PriceResponse,
    ) -> Result<Self, PricingErrorKind> {
        if let Some(message) = response.error {
            if is_out_of_stock_message(&message, &product_id) {
                return Ok(Self::OutOfStock {
                    product_id,
                    message,
                });
            }
            return Err(PricingErrorKind::Rejected(message));
        }

        let customer_price = response.customer_price.ok_or_else(|| {
            PricingErrorKind::InvalidResponse("missing customer_price".to_string())
        })?;
        let provider = response
            .provider
            .ok_or_else(|| PricingErrorKind::InvalidResponse("missing provider".to_string()))?;

        let quote = Quote {
            product_id,
            customer_price,
            dealer_price: response.dealer_price,
            provider,
            expire_at_ms: response.expire_time_ms,
        };

        Ok(match response.all_providers {
            Some(providers) if !providers.is_empty() => Self::WithAllProviders { quote, providers },
            _ => Self::Basic(quote),
        })
    }

    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        match self {
            Self::Basic(quote) | Self::WithAllProviders { quote, .. } => &quote.product_id,
            Self::OutOfStock { product_id, .. } => product_id,
        }
    }

    /// The priced part, absent when out of stock.
    #[must_use]
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Basic(quote) | Self::WithAllProviders { quote, .. } => Some(quote),
            Self::OutOfStock { .. } => None,
        }
    }

    /// Per-provider figures, if the response carried them.
    #[must_use]
    pub fn providers(&self) -> Option<&IndexMap<String, ProviderQuote>> {
        match self {
            Self::WithAllProviders { providers, .. } => Some(providers),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        matches!(self, Self::OutOfStock { .. })
    }

    #[must_use]
    pub fn expire_at_ms(&self) -> Option<i64> {
        self.quote().and_then(|q| q.expire_at_ms)
    }

    /// Whole minutes of validity left at `now`, see [`crate::pricing::minutes_remaining`].
    #[must_use]
    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> Option<u64> {
        crate::pricing::minutes_remaining(self, now)
    }
}
