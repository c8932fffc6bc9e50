//! `quote` command: request prices for a list of products.

use super::{connect, wait_budget, OutputOptions};
use crate::config::AppConfig;
use crate::model::ProductId;
use crate::reports::{write_output, OfferStatus, QuoteReport};
use crate::session::{BrowseSession, SessionEvent};
use anyhow::Result;
use chrono::Utc;
use indexmap::IndexMap;

/// Request every id concurrently, wait, and print one line per id.
///
/// Exits with 1 if any quote failed or did not arrive in time.
pub fn run_quote(config: &AppConfig, ids: &[String], output: &OutputOptions) -> Result<i32> {
    let backend = connect(config)?;
    let mut session = BrowseSession::new(
        backend,
        config.pricing_context(),
        config.session_options(),
    );
    tracing::debug!("Quoting {} products as {}", ids.len(), session.pricing_context());

    let mut unique: Vec<ProductId> = Vec::with_capacity(ids.len());
    for raw in ids {
        let id = ProductId::parse(raw);
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    for id in &unique {
        session.request_offer(id.clone());
    }

    let mut failures: IndexMap<ProductId, String> = IndexMap::new();
    for event in session.wait_idle(wait_budget(config)) {
        if let SessionEvent::OfferFailed {
            product_id,
            message,
        } = event
        {
            failures.insert(product_id, message);
        }
    }
    session.fetch_stats().log_summary();

    let now = Utc::now();
    let reports: Vec<QuoteReport> = unique
        .into_iter()
        .map(|product_id| {
            let status = match (session.offer(&product_id), failures.get(&product_id)) {
                (Some(offer), _) => OfferStatus::from_offer(offer, now),
                (None, Some(message)) => OfferStatus::Failed {
                    message: message.clone(),
                },
                (None, None) => OfferStatus::Pending,
            };
            QuoteReport { product_id, status }
        })
        .collect();

    let incomplete = reports
        .iter()
        .any(|r| matches!(r.status, OfferStatus::Failed { .. } | OfferStatus::Pending));

    let rendered = output.reporter().render_quotes(&reports)?;
    write_output(&rendered, &output.target)?;
    Ok(i32::from(incomplete))
}
