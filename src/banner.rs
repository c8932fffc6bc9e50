//! Session-wide error banner.
//!
//! Catalog and pricing failures both land here; the most recent one wins.
//! An out-of-stock answer never does.

use crate::error::QuoteError;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Which part of the session raised the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerSource {
    Catalog,
    Pricing,
    Other,
}

impl BannerSource {
    fn of(error: &QuoteError) -> Self {
        if error.is_catalog() {
            Self::Catalog
        } else if error.is_pricing() {
            Self::Pricing
        } else {
            Self::Other
        }
    }
}

/// Message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerMessage {
    pub source: BannerSource,
    pub text: String,
}

/// Transient error banner with optional auto-clear.
///
/// ```ignore
/// let mut banner = Banner::with_auto_clear(Duration::from_secs(5));
/// banner.report(&err);
/// if let Some(msg) = banner.current() {
///     eprintln!("{}", msg.text);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Banner {
    message: Option<BannerMessage>,
    set_at: Option<Instant>,
    auto_clear_after: Option<Duration>,
}

impl Banner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_auto_clear(duration: Duration) -> Self {
        Self {
            message: None,
            set_at: None,
            auto_clear_after: Some(duration),
        }
    }

    /// Show `error`, replacing whatever was shown before.
    pub fn report(&mut self, error: &QuoteError) {
        let mut text = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        self.set(BannerSource::of(error), text);
    }

    pub fn set(&mut self, source: BannerSource, text: impl Into<String>) {
        self.message = Some(BannerMessage {
            source,
            text: text.into(),
        });
        self.set_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.set_at = None;
    }

    /// Current message, dropping it first if it has outlived its auto-clear.
    pub fn current(&mut self) -> Option<&BannerMessage> {
        let expired = match (self.set_at, self.auto_clear_after) {
            (Some(set_at), Some(duration)) => set_at.elapsed() >= duration,
            _ => false,
        };
        if expired {
            self.clear();
        }
        self.message.as_ref()
    }

    /// Current message without the auto-clear check.
    #[must_use]
    pub const fn peek(&self) -> Option<&BannerMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.message.is_some()
    }

    /// Take the message, clearing the banner.
    pub fn take(&mut self) -> Option<BannerMessage> {
        self.set_at = None;
        self.message.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogErrorKind, PricingErrorKind};
    use std::thread;

    #[test]
    fn test_most_recent_wins() {
        let mut banner = Banner::new();
        banner.report(&QuoteError::catalog(
            "listing products",
            CatalogErrorKind::HttpStatus { status: 502 },
        ));
        banner.report(&QuoteError::pricing(
            "product 7",
            PricingErrorKind::NetworkError("timeout".into()),
        ));
        let msg = banner.peek().unwrap();
        assert_eq!(msg.source, BannerSource::Pricing);
        assert_eq!(
            msg.text,
            "Price request failed: product 7: Network error: timeout"
        );
    }

    #[test]
    fn test_take_clears() {
        let mut banner = Banner::new();
        banner.set(BannerSource::Other, "hello");
        assert_eq!(banner.take().map(|m| m.text), Some("hello".to_string()));
        assert!(!banner.is_shown());
    }

    #[test]
    fn test_auto_clear() {
        let mut banner = Banner::with_auto_clear(Duration::from_millis(50));
        banner.set(BannerSource::Catalog, "down");
        assert!(banner.current().is_some());
        thread::sleep(Duration::from_millis(60));
        assert!(banner.current().is_none());
    }

    #[test]
    fn test_no_auto_clear_by_default() {
        let mut banner = Banner::new();
        banner.set(BannerSource::Catalog, "down");
        thread::sleep(Duration::from_millis(10));
        assert!(banner.current().is_some());
    }
}
