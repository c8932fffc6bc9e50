//! Configuration types for parts-quote.

use super::defaults::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::catalog::{SortDirection, SortField, SortOrder};
use crate::model::PricingContext;
use crate::session::{SessionOptions, DEFAULT_PAGE_SIZE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a config file and overridden by CLI
/// arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Where the catalog comes from
    pub backend: BackendConfig,
    /// Product list presentation
    pub view: ViewConfig,
    /// Pricing context sent with every price request
    pub pricing: PricingConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    #[must_use]
    pub fn pricing_context(&self) -> PricingContext {
        PricingContext::new(self.pricing.user_type.clone(), self.pricing.password.clone())
    }

    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            page_size: self.view.page_size,
            sort: SortOrder::new(self.view.sort_field, self.view.sort_direction),
            banner_auto_clear: self.view.banner_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Copy safe to print: the password is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.pricing.password.is_some() {
            copy.pricing.password = Some("***".to_string());
        }
        copy
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.backend.base_url = url.into();
        self
    }

    pub const fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.backend.timeout_secs = secs;
        self
    }

    pub fn fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backend.fixture = Some(path.into());
        self
    }

    pub const fn page_size(mut self, size: usize) -> Self {
        self.config.view.page_size = size;
        self
    }

    pub const fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.config.view.sort_field = field;
        self.config.view.sort_direction = direction;
        self
    }

    pub fn user_type(mut self, user_type: impl Into<String>) -> Self {
        self.config.pricing.user_type = Some(user_type.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.pricing.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Catalog backend location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,
    /// Product list endpoint
    pub products_path: String,
    /// Category tree endpoint
    pub categories_path: String,
    /// Price endpoint
    pub price_path: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Serve the catalog from this JSON file instead of the network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            products_path: "/products".to_string(),
            categories_path: "/categories".to_string(),
            price_path: "/price".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fixture: None,
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[cfg(feature = "http")]
    #[must_use]
    pub fn http_config(&self) -> crate::client::HttpBackendConfig {
        crate::client::HttpBackendConfig {
            base_url: self.base_url.clone(),
            products_path: self.products_path.clone(),
            categories_path: self.categories_path.clone(),
            price_path: self.price_path.clone(),
            timeout: self.timeout(),
        }
    }
}

/// Product list presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewConfig {
    /// Products per page
    pub page_size: usize,
    /// Initial sort column
    pub sort_field: SortField,
    /// Initial sort direction
    pub sort_direction: SortDirection,
    /// Hide error messages after this many seconds (omit to keep them)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_timeout_secs: Option<u64>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            banner_timeout_secs: None,
        }
    }
}

/// Pricing context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PricingConfig {
    /// Customer tier tag, sent as `userType`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    /// Credential for dealer tiers, sent as `password`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
