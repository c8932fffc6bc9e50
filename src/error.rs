//! Unified error types for parts-quote.
//!
//! Catalog failures (category tree or product list) and pricing failures
//! (one product's quote) are kept in separate variants so callers can route
//! them to the right place. An out-of-stock answer is never an error; it is
//! decoded into [`crate::model::Offer::OutOfStock`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for parts-quote operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QuoteError {
    /// Errors while loading the category tree or the product list
    #[error("Catalog request failed: {context}")]
    Catalog {
        context: String,
        #[source]
        source: CatalogErrorKind,
    },

    /// Errors while retrieving a price offer
    #[error("Price request failed: {context}")]
    Pricing {
        context: String,
        #[source]
        source: PricingErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific catalog error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogErrorKind {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Backend returned status {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Catalog worker disconnected")]
    WorkerGone,
}

/// Specific pricing error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PricingErrorKind {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Backend returned status {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The backend answered with an error message that is not the
    /// out-of-stock marker.
    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Price worker disconnected")]
    WorkerGone,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for parts-quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl QuoteError {
    /// Create a catalog error with context
    pub fn catalog(context: impl Into<String>, source: CatalogErrorKind) -> Self {
        Self::Catalog {
            context: context.into(),
            source,
        }
    }

    /// Create a pricing error with context
    pub fn pricing(context: impl Into<String>, source: PricingErrorKind) -> Self {
        Self::Pricing {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error came from the catalog channel.
    #[must_use]
    pub const fn is_catalog(&self) -> bool {
        matches!(self, Self::Catalog { .. })
    }

    /// Whether this error came from the pricing channel.
    #[must_use]
    pub const fn is_pricing(&self) -> bool {
        matches!(self, Self::Pricing { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for QuoteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::catalog(
            "JSON deserialization",
            CatalogErrorKind::InvalidResponse(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to whatever context the error already
/// carries, so a chain reads outermost first:
///
/// ```ignore
/// use parts_quote::error::ErrorContext;
///
/// backend
///     .list_products(&query)
///     .with_context(|| format!("loading page for '{}'", query.search_term))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<QuoteError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: QuoteError, new_ctx: &str) -> QuoteError {
    match err {
        QuoteError::Catalog {
            context: existing,
            source,
        } => QuoteError::Catalog {
            context: chain_context(new_ctx, &existing),
            source,
        },
        QuoteError::Pricing {
            context: existing,
            source,
        } => QuoteError::Pricing {
            context: chain_context(new_ctx, &existing),
            source,
        },
        QuoteError::Io {
            path,
            message,
            source,
        } => QuoteError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        QuoteError::Config(msg) => QuoteError::Config(chain_context(new_ctx, &msg)),
        QuoteError::Validation(msg) => QuoteError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Returns "`new`: `existing`", or just `new` when nothing exists yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| QuoteError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| QuoteError::Validation(f().into()))
    }
}
