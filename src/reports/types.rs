//! Serializable report structs shared by every output format.

use crate::banner::BannerMessage;
use crate::catalog::{PageView, SortOrder};
use crate::model::{CategoryPath, Offer, ProductId, ProviderQuote};
use crate::session::{BrowseSession, OfferCell};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Offer column of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OfferStatus {
    NotFetched,
    Pending,
    Quoted {
        customer_price: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        dealer_price: Option<f64>,
        provider: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        minutes_remaining: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        providers: Option<IndexMap<String, ProviderQuote>>,
    },
    OutOfStock {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl OfferStatus {
    #[must_use]
    pub fn from_offer(offer: &Offer, now: DateTime<Utc>) -> Self {
        match offer {
            Offer::OutOfStock { message, .. } => Self::OutOfStock {
                message: message.clone(),
            },
            Offer::Basic(quote) | Offer::WithAllProviders { quote, .. } => Self::Quoted {
                customer_price: quote.customer_price,
                dealer_price: quote.dealer_price,
                provider: quote.provider.clone(),
                minutes_remaining: offer.minutes_remaining(now),
                providers: offer.providers().cloned(),
            },
        }
    }

    #[must_use]
    pub fn from_cell(cell: OfferCell<'_>, now: DateTime<Utc>) -> Self {
        match cell {
            OfferCell::NotFetched => Self::NotFetched,
            OfferCell::Pending(_) => Self::Pending,
            OfferCell::Quoted(offer) | OfferCell::OutOfStock(offer) => {
                Self::from_offer(offer, now)
            }
        }
    }
}

/// One row of the product table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub offer: OfferStatus,
}

/// One page of the product list, with the view state that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub sort: SortOrder,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search_term: String,
    #[serde(skip_serializing_if = "CategoryPath::is_root")]
    pub category: CategoryPath,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_filter: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id_filter: String,
    pub rows: Vec<ProductRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<BannerMessage>,
}

impl PageReport {
    /// Snapshot the session's current page.
    pub fn from_session(session: &mut BrowseSession, now: DateTime<Utc>) -> Self {
        let banner = session.banner().cloned();
        let view = session.view().clone();
        let page: PageView<'_> = session.current_page();

        let rows = page
            .items
            .iter()
            .map(|product| ProductRow {
                id: product.id.clone(),
                name: product.name.clone(),
                image: product.image_path(),
                offer: OfferStatus::from_cell(session.offer_cell(&product.id), now),
            })
            .collect();

        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            sort: view.sort,
            search_term: view.search_term,
            category: view.category,
            name_filter: view.name_filter,
            id_filter: view.id_filter,
            rows,
            banner,
        }
    }
}

/// Outcome of one requested quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub status: OfferStatus,
}
