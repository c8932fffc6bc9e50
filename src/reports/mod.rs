//! Rendering of categories, product pages and quotes.
//!
//! Two formats: aligned text for terminals and JSON for scripts. Both
//! render the same report structs from [`types`], so a surface only decides
//! the format, never the content.

mod json;
mod output;
mod text;
mod types;

pub use json::JsonReporter;
pub use output::{should_use_color, write_output, OutputTarget};
pub use text::TextReporter;
pub use types::{OfferStatus, PageReport, ProductRow, QuoteReport};

use crate::model::CategoryNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while rendering
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders reports in one output format.
pub trait Reporter {
    fn render_categories(&self, tree: &CategoryNode) -> Result<String, ReportError>;

    fn render_page(&self, page: &PageReport) -> Result<String, ReportError>;

    fn render_quotes(&self, quotes: &[QuoteReport]) -> Result<String, ReportError>;

    fn format(&self) -> OutputFormat;
}

/// Reporter for `format`. `colored` only affects text output.
#[must_use]
pub fn reporter(format: OutputFormat, colored: bool) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => {
            let text = TextReporter::new();
            Box::new(if colored { text } else { text.no_color() })
        }
        OutputFormat::Json => Box::new(JsonReporter::new()),
    }
}
