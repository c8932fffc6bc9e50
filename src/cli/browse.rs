//! `browse` command: a line-oriented session over stdin.
//!
//! Each input line is one user action. Catalog-changing actions wait for the
//! new product list before printing the page; `quote` returns at once and
//! `wait` blocks for outstanding prices.

use super::{connect, wait_budget, OutputOptions};
use crate::catalog::{Advance, SortField};
use crate::config::AppConfig;
use crate::model::{PricingContext, ProductId};
use crate::reports::{PageReport, Reporter};
use crate::session::{BrowseSession, SessionEvent};
use anyhow::Result;
use chrono::Utc;
use std::io::{BufRead, Write};
use std::time::Duration;

const HELP: &str = "\
commands:
  show                      print the current page
  menu                      list the open category submenu
  cd <name>                 open or pick a category in the submenu
  up | top                  go up one submenu | back to the top
  levels                    list choices per category level
  pick <level> <name>       set one category level (0 = top)
  all                       drop the category filter
  search [term]             server-side search (empty clears)
  name [text] | id [text]   local filters (empty clears)
  sort <name|id>            sort by column, again to flip
  next | prev | page <n>    paging
  quote <id>                request a price
  wait                      wait for outstanding prices
  context public | context <user-type> [password]
  quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Help,
    Show,
    Menu,
    Enter(String),
    Up,
    Top,
    Levels,
    Pick { depth: usize, name: String },
    AllCategories,
    Search(String),
    NameFilter(String),
    IdFilter(String),
    Sort(SortField),
    Next,
    Prev,
    Page(usize),
    Quote(ProductId),
    Wait,
    Context(PricingContext),
    Quit,
}

impl BrowseCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let need = |what: &str| require(word, rest, what);

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "show" | "ls" => Self::Show,
            "menu" => Self::Menu,
            "cd" => Self::Enter(need("category name")?.to_string()),
            "up" | ".." => Self::Up,
            "top" => Self::Top,
            "levels" => Self::Levels,
            "pick" => {
                let (depth, name) = need("level and name")?
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "pick: expected <level> <name>".to_string())?;
                let depth = depth
                    .parse()
                    .map_err(|_| format!("pick: '{depth}' is not a level number"))?;
                Self::Pick {
                    depth,
                    name: name.trim().to_string(),
                }
            }
            "all" => Self::AllCategories,
            "search" => Self::Search(rest.to_string()),
            "name" => Self::NameFilter(rest.to_string()),
            "id" => Self::IdFilter(rest.to_string()),
            "sort" => match need("column")?.to_lowercase().as_str() {
                "name" => Self::Sort(SortField::Name),
                "id" => Self::Sort(SortField::Id),
                other => return Err(format!("sort: unknown column '{other}'")),
            },
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "page" => {
                let raw = need("page number")?;
                Self::Page(
                    raw.parse()
                        .map_err(|_| format!("page: '{raw}' is not a number"))?,
                )
            }
            "quote" | "q" => Self::Quote(ProductId::parse(need("product id")?)),
            "wait" => Self::Wait,
            "context" => {
                let mut parts = need("'public' or a user type")?.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some("public"), None) => Self::Context(PricingContext::public()),
                    (user_type, password) => Self::Context(PricingContext::new(
                        user_type.map(str::to_string),
                        password.map(str::to_string),
                    )),
                }
            }
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

fn require<'a>(word: &str, rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("{word}: missing {what}"))
    } else {
        Ok(rest)
    }
}

/// Run `browse` on stdin/stdout.
pub fn run_browse(config: &AppConfig, output: &OutputOptions) -> Result<i32> {
    let backend = connect(config)?;
    let mut session = BrowseSession::new(
        backend,
        config.pricing_context(),
        config.session_options(),
    );
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_browse_with(
        &mut session,
        stdin.lock(),
        &mut stdout,
        output.reporter().as_ref(),
        wait_budget(config),
    )?;
    session.fetch_stats().log_summary();
    Ok(0)
}

/// Drive `session` from `input`, writing everything to `out`.
pub fn run_browse_with(
    session: &mut BrowseSession,
    input: impl BufRead,
    out: &mut impl Write,
    reporter: &dyn Reporter,
    wait: Duration,
) -> Result<()> {
    session.load_categories();
    session.refresh_products();
    session.wait_catalog(wait);
    print_page(session, out, reporter)?;

    for line in input.lines() {
        let line = line?;
        let command = match BrowseCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        if command == BrowseCommand::Quit {
            break;
        }
        execute(session, command, out, reporter, wait)?;
        report_events(session.poll(), out)?;
    }
    Ok(())
}

fn print_page(
    session: &mut BrowseSession,
    out: &mut impl Write,
    reporter: &dyn Reporter,
) -> Result<()> {
    let report = PageReport::from_session(session, Utc::now());
    writeln!(out, "{}", reporter.render_page(&report)?)?;
    Ok(())
}

fn print_advance(outcome: &Advance, out: &mut impl Write) -> std::io::Result<()> {
    match outcome {
        Advance::InProgress(path) => writeln!(out, "in {path}"),
        Advance::Committed(path) => writeln!(out, "filtering by {path}"),
        Advance::NotFound => writeln!(out, "no such category here"),
    }
}

fn report_events(events: Vec<SessionEvent>, out: &mut impl Write) -> std::io::Result<()> {
    for event in events {
        match event {
            SessionEvent::OfferStored(id) => writeln!(out, "price for {id} arrived")?,
            SessionEvent::OfferFailed { message, .. } => writeln!(out, "! {message}")?,
            SessionEvent::OfferDiscarded(id) => {
                writeln!(out, "dropped a price for {id} from an earlier pricing context")?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn execute(
    session: &mut BrowseSession,
    command: BrowseCommand,
    out: &mut impl Write,
    reporter: &dyn Reporter,
    wait: Duration,
) -> Result<()> {
    match command {
        BrowseCommand::Help => writeln!(out, "{HELP}")?,
        BrowseCommand::Show => print_page(session, out, reporter)?,
        BrowseCommand::Menu => {
            if session.menu_options().is_empty() {
                writeln!(out, "(no categories)")?;
            }
            for node in session.menu_options() {
                let marker = if node.is_leaf() { "" } else { " >" };
                writeln!(out, "  {}{marker}", node.name)?;
            }
        }
        BrowseCommand::Enter(name) => {
            let outcome = session.choose_category(&name);
            print_advance(&outcome, out)?;
            if outcome.is_committed() {
                session.wait_catalog(wait);
                print_page(session, out, reporter)?;
            }
        }
        BrowseCommand::Pick { depth, name } => {
            let outcome = session.select_category_level(depth, &name);
            print_advance(&outcome, out)?;
            if outcome.is_committed() {
                session.wait_catalog(wait);
                print_page(session, out, reporter)?;
            }
        }
        BrowseCommand::Up => {
            session.menu_back();
            writeln!(out, "in {}", session.menu_path())?;
        }
        BrowseCommand::Top => {
            session.menu_reset();
            writeln!(out, "at top level")?;
        }
        BrowseCommand::Levels => {
            for (depth, options) in session.dropdown_levels().iter().enumerate() {
                let names: Vec<&str> = options.iter().map(|n| n.name.as_str()).collect();
                writeln!(out, "  {depth}: {}", names.join(" | "))?;
            }
        }
        BrowseCommand::AllCategories => {
            session.clear_category();
            session.wait_catalog(wait);
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Search(term) => {
            session.set_search_term(&term);
            session.wait_catalog(wait);
            print_page(session, out, reporter)?;
        }
        BrowseCommand::NameFilter(filter) => {
            session.set_name_filter(&filter);
            print_page(session, out, reporter)?;
        }
        BrowseCommand::IdFilter(filter) => {
            session.set_id_filter(&filter);
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Sort(field) => {
            session.sort_by(field);
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Next => {
            session.next_page();
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Prev => {
            session.prev_page();
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Page(page) => {
            session.goto_page(page);
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Quote(id) => {
            writeln!(out, "requesting price for {id}")?;
            session.request_offer(id);
        }
        BrowseCommand::Wait => {
            report_events(session.wait_idle(wait), out)?;
            print_page(session, out, reporter)?;
        }
        BrowseCommand::Context(context) => {
            session.set_pricing_context(context);
            writeln!(
                out,
                "pricing as {}; cached prices cleared",
                session.pricing_context()
            )?;
        }
        BrowseCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StaticBackend;
    use crate::model::{CategoryNode, CategoryPath, PriceResponse, Product};
    use crate::reports::TextReporter;
    use crate::session::SessionOptions;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BrowseCommand::parse("  "), Ok(None));
        assert_eq!(
            BrowseCommand::parse("cd Apple iPhone"),
            Ok(Some(BrowseCommand::Enter("Apple iPhone".into())))
        );
        assert_eq!(
            BrowseCommand::parse("pick 1 Galaxy S"),
            Ok(Some(BrowseCommand::Pick {
                depth: 1,
                name: "Galaxy S".into()
            }))
        );
        assert_eq!(
            BrowseCommand::parse("search"),
            Ok(Some(BrowseCommand::Search(String::new())))
        );
        assert_eq!(
            BrowseCommand::parse("quote 42"),
            Ok(Some(BrowseCommand::Quote(ProductId::Number(42))))
        );
        assert_eq!(
            BrowseCommand::parse("context dealer pw"),
            Ok(Some(BrowseCommand::Context(PricingContext::new(
                Some("dealer".into()),
                Some("pw".into())
            ))))
        );
        assert!(BrowseCommand::parse("page two").is_err());
        assert!(BrowseCommand::parse("sort price").is_err());
        assert!(BrowseCommand::parse("fly").is_err());
    }

    #[test]
    fn test_scripted_session() {
        let backend = StaticBackend::new()
            .with_tree(CategoryNode::root(vec![CategoryNode::branch(
                "Phones",
                vec![CategoryNode::leaf("iPhone"), CategoryNode::leaf("Samsung")],
            )]))
            .with_product(
                CategoryPath::from_segments(["Phones", "iPhone"]),
                Product::new(1, "iPhone 12 Display"),
            )
            .with_product(
                CategoryPath::from_segments(["Phones", "Samsung"]),
                Product::new(2, "Galaxy S21 Akku"),
            )
            .with_price(
                1,
                PriceResponse {
                    customer_price: Some(89.9),
                    provider: Some("foneday".into()),
                    ..PriceResponse::default()
                },
            );
        let mut session = BrowseSession::new(
            Arc::new(backend),
            PricingContext::public(),
            SessionOptions::default(),
        );

        let script = "cd Phones\ncd iPhone\nquote 1\nwait\nquit\nshow\n";
        let mut out = Vec::new();
        run_browse_with(
            &mut session,
            script.as_bytes(),
            &mut out,
            &TextReporter::new().no_color(),
            Duration::from_secs(5),
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("in Phones"));
        assert!(text.contains("filtering by Phones > iPhone"));
        assert!(text.contains("89.90 € customer via foneday"));
        assert_eq!(session.view().category, CategoryPath::from_segments(["Phones", "iPhone"]));
    }
}
