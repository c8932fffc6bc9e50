//! CLI command handlers.
//!
//! Handlers are invoked by main.rs and return an exit code; all rendering
//! goes through [`crate::reports`].

mod browse;
mod categories;
mod products;
mod quote;

pub use browse::{run_browse, run_browse_with, BrowseCommand};
pub use categories::run_categories;
pub use products::{run_products, ProductsOptions};
pub use quote::run_quote;

use crate::client::{CatalogBackend, StaticBackend};
use crate::config::AppConfig;
use crate::reports::{should_use_color, OutputFormat, OutputTarget, Reporter};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Where and how a handler writes its result.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub target: OutputTarget,
    pub no_color: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            target: OutputTarget::Stdout,
            no_color: false,
        }
    }
}

impl OutputOptions {
    fn reporter(&self) -> Box<dyn Reporter> {
        crate::reports::reporter(self.format, should_use_color(self.no_color, &self.target))
    }
}

/// How long a handler waits for outstanding requests: one request timeout
/// plus a little slack for thread hand-off.
fn wait_budget(config: &AppConfig) -> Duration {
    config.backend.timeout() + Duration::from_secs(1)
}

/// Open the backend the config points at: a fixture file if one is set,
/// the HTTP API otherwise.
pub fn connect(config: &AppConfig) -> Result<Arc<dyn CatalogBackend>> {
    if let Some(path) = &config.backend.fixture {
        let backend = StaticBackend::from_fixture_file(path)
            .with_context(|| format!("loading fixture {}", path.display()))?;
        tracing::info!("Serving catalog from {}", path.display());
        return Ok(Arc::new(backend));
    }

    #[cfg(feature = "http")]
    {
        let backend = crate::client::HttpBackend::new(config.backend.http_config())
            .context("creating HTTP backend")?;
        tracing::debug!("Using catalog API at {}", config.backend.base_url);
        Ok(Arc::new(backend))
    }

    #[cfg(not(feature = "http"))]
    {
        anyhow::bail!("built without the `http` feature; set backend.fixture to browse offline")
    }
}
