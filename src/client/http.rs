//! HTTP catalog backend.

use super::CatalogBackend;
use crate::catalog::ProductQuery;
use crate::error::{CatalogErrorKind, PricingErrorKind, QuoteError, Result};
use crate::model::{
    is_out_of_stock_message, CategoryNode, CategoryPayload, PriceResponse, PricingContext,
    Product, ProductId,
};
use reqwest::blocking::{Client, Response};
use std::time::Duration;

/// HTTP backend configuration.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL all endpoint paths are appended to
    pub base_url: String,
    pub products_path: String,
    pub categories_path: String,
    pub price_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::PRODUCTION_BASE_URL.to_string(),
            products_path: "/products".to_string(),
            categories_path: "/categories".to_string(),
            price_path: "/price".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpBackendConfig {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Blocking HTTP client for the catalog backend.
///
/// Price requests run on worker threads, so the blocking client never
/// stalls the control thread.
pub struct HttpBackend {
    client: Client,
    config: HttpBackendConfig,
}

fn catalog_network_error(msg: &str, err: &reqwest::Error) -> QuoteError {
    QuoteError::catalog(msg, CatalogErrorKind::NetworkError(err.to_string()))
}

fn pricing_network_error(msg: &str, err: &reqwest::Error) -> QuoteError {
    QuoteError::pricing(msg, PricingErrorKind::NetworkError(err.to_string()))
}

impl HttpBackend {
    /// Create a new HTTP backend.
    pub fn new(config: HttpBackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| catalog_network_error("Failed to create HTTP client", &e))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn get_catalog(&self, path: &str, params: &[(String, String)]) -> Result<Response> {
        let url = self.config.url(path);
        tracing::debug!("GET {url} {params:?}");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .map_err(|e| catalog_network_error(&url, &e))?;

        if !response.status().is_success() {
            return Err(QuoteError::catalog(
                url,
                CatalogErrorKind::HttpStatus {
                    status: response.status().as_u16(),
                },
            ));
        }
        Ok(response)
    }
}

impl CatalogBackend for HttpBackend {
    fn list_categories(&self) -> Result<CategoryNode> {
        let payload: CategoryPayload = self
            .get_catalog(&self.config.categories_path, &[])?
            .json()
            .map_err(|e| {
                QuoteError::catalog(
                    "decoding category tree",
                    CatalogErrorKind::InvalidResponse(e.to_string()),
                )
            })?;
        Ok(payload.into_root())
    }

    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        self.get_catalog(&self.config.products_path, &query.query_params())?
            .json()
            .map_err(|e| {
                QuoteError::catalog(
                    "decoding product list",
                    CatalogErrorKind::InvalidResponse(e.to_string()),
                )
            })
    }

    fn get_price(&self, product_id: &ProductId, context: &PricingContext) -> Result<PriceResponse> {
        let url = self.config.url(&self.config.price_path);
        let id = product_id.to_string();
        let mut params: Vec<(&str, &str)> = vec![("product_id", id.as_str())];
        params.extend(context.query_params());

        tracing::debug!("GET {url} product_id={id} context={context}");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .map_err(|e| pricing_network_error(&format!("product {id}"), &e))?;

        let status = response.status();
        let body: std::result::Result<PriceResponse, _> = response.json();

        if status.is_success() {
            return body.map_err(|e| {
                QuoteError::pricing(
                    format!("product {id}"),
                    PricingErrorKind::InvalidResponse(e.to_string()),
                )
            });
        }

        // Some deployments send the out-of-stock marker with a 404.
        match body {
            Ok(parsed)
                if parsed
                    .error
                    .as_deref()
                    .is_some_and(|msg| is_out_of_stock_message(msg, product_id)) =>
            {
                Ok(parsed)
            }
            _ => Err(QuoteError::pricing(
                format!("product {id}"),
                PricingErrorKind::HttpStatus {
                    status: status.as_u16(),
                },
            )),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
