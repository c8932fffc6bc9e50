//! `categories` command: print the category tree.

use super::{connect, wait_budget, OutputOptions};
use crate::config::AppConfig;
use crate::reports::write_output;
use crate::session::{BrowseSession, SessionEvent};
use anyhow::Result;

pub fn run_categories(config: &AppConfig, output: &OutputOptions) -> Result<i32> {
    let backend = connect(config)?;
    let mut session = BrowseSession::new(
        backend,
        config.pricing_context(),
        config.session_options(),
    );

    session.load_categories();
    let events = session.wait_catalog(wait_budget(config));
    if !events.contains(&SessionEvent::CategoriesLoaded) {
        if let Some(banner) = session.banner() {
            eprintln!("{}", banner.text);
        }
        return Ok(1);
    }

    let rendered = output.reporter().render_categories(session.tree())?;
    write_output(&rendered, &output.target)?;
    Ok(0)
}
