//! `products` command: fetch, filter, sort and print one page.

use super::{connect, wait_budget, OutputOptions};
use crate::catalog::{SortDirection, SortField, SortOrder};
use crate::config::AppConfig;
use crate::model::CategoryPath;
use crate::reports::{write_output, PageReport};
use crate::session::BrowseSession;
use anyhow::Result;
use chrono::Utc;

/// What to show.
#[derive(Debug, Clone, Default)]
pub struct ProductsOptions {
    /// Server-side search term
    pub search: Option<String>,
    /// Category path, top level first
    pub category: Vec<String>,
    pub name_filter: Option<String>,
    pub id_filter: Option<String>,
    /// Overrides the configured sort column
    pub sort_field: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
    pub page: usize,
    /// Also request a price for every row on the page
    pub quote: bool,
}

pub fn run_products(
    config: &AppConfig,
    options: &ProductsOptions,
    output: &OutputOptions,
) -> Result<i32> {
    let backend = connect(config)?;
    let mut session_options = config.session_options();
    session_options.sort = SortOrder::new(
        options.sort_field.unwrap_or(session_options.sort.field),
        options.sort_direction.unwrap_or(session_options.sort.direction),
    );
    let mut session = BrowseSession::new(backend, config.pricing_context(), session_options);

    session.set_category(CategoryPath::from_segments(options.category.iter().cloned()));
    if let Some(term) = &options.search {
        session.set_search_term(term);
    }
    if !session.is_loading() {
        session.refresh_products();
    }
    session.wait_catalog(wait_budget(config));

    if let Some(filter) = &options.name_filter {
        session.set_name_filter(filter);
    }
    if let Some(filter) = &options.id_filter {
        session.set_id_filter(filter);
    }
    session.goto_page(options.page);

    if options.quote {
        let ids: Vec<_> = session
            .current_page()
            .items
            .iter()
            .map(|p| p.id.clone())
            .collect();
        for id in ids {
            session.request_offer(id);
        }
        session.wait_idle(wait_budget(config));
        session.fetch_stats().log_summary();
    }

    let failed = session.banner().is_some();
    let report = PageReport::from_session(&mut session, Utc::now());
    let rendered = output.reporter().render_page(&report)?;
    write_output(&rendered, &output.target)?;
    Ok(i32::from(failed))
}
