//! Plain text reporter for terminals.

use super::{OfferStatus, OutputFormat, PageReport, QuoteReport, ReportError, Reporter};
use crate::catalog::SortField;
use crate::model::CategoryNode;
use std::fmt::Write;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

fn euros(amount: f64) -> String {
    format!("{amount:.2} €")
}

/// Text reporter
pub struct TextReporter {
    colored: bool,
}

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn write_tree(&self, out: &mut String, nodes: &[CategoryNode], depth: usize) -> std::fmt::Result {
        for node in nodes {
            let name = if node.is_leaf() {
                node.name.clone()
            } else {
                self.color(&node.name, "bold")
            };
            writeln!(out, "{}{name}", "  ".repeat(depth))?;
            self.write_tree(out, &node.children, depth + 1)?;
        }
        Ok(())
    }

    /// Offer column text.
    fn offer_text(&self, status: &OfferStatus) -> String {
        match status {
            OfferStatus::NotFetched => self.color("-", "dim"),
            OfferStatus::Pending => self.color("loading...", "dim"),
            OfferStatus::OutOfStock { .. } => self.color("out of stock", "yellow"),
            OfferStatus::Failed { message } => self.color(&format!("failed: {message}"), "red"),
            OfferStatus::Quoted {
                customer_price,
                dealer_price,
                provider,
                minutes_remaining,
                ..
            } => {
                let mut text = format!("{} customer", self.color(&euros(*customer_price), "green"));
                if let Some(dealer) = dealer_price {
                    let _ = write!(text, " / {} dealer", euros(*dealer));
                }
                let _ = write!(text, " via {provider}");
                match minutes_remaining {
                    Some(0) => text.push_str(&self.color(" (expired)", "red")),
                    Some(minutes) => {
                        let _ = write!(text, " (valid {minutes} min)");
                    }
                    None => {}
                }
                text
            }
        }
    }

    fn write_providers(&self, out: &mut String, status: &OfferStatus) -> std::fmt::Result {
        if let OfferStatus::Quoted {
            providers: Some(providers),
            ..
        } = status
        {
            for (name, quote) in providers {
                let figure = |value: Option<f64>| value.map_or_else(|| "-".to_string(), euros);
                writeln!(
                    out,
                    "    {name:<16} cost {:>10}  dealer {:>10}  customer {:>10}",
                    figure(quote.cost),
                    figure(quote.dealer_price),
                    figure(quote.customer_price)
                )?;
            }
        }
        Ok(())
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TextReporter {
    fn render_categories(&self, tree: &CategoryNode) -> Result<String, ReportError> {
        let mut out = String::new();
        if tree.children.is_empty() {
            out.push_str("No categories.\n");
        }
        self.write_tree(&mut out, &tree.children, 0)?;
        Ok(out)
    }

    fn render_page(&self, page: &PageReport) -> Result<String, ReportError> {
        let mut out = String::new();

        if let Some(banner) = &page.banner {
            writeln!(out, "{}", self.color(&format!("! {}", banner.text), "red"))?;
        }

        let mut scope = Vec::new();
        if !page.category.is_root() {
            scope.push(format!("category {}", page.category));
        }
        if !page.search_term.is_empty() {
            scope.push(format!("search \"{}\"", page.search_term));
        }
        if !page.name_filter.is_empty() {
            scope.push(format!("name ~ \"{}\"", page.name_filter));
        }
        if !page.id_filter.is_empty() {
            scope.push(format!("id ~ \"{}\"", page.id_filter));
        }
        if !scope.is_empty() {
            writeln!(out, "{}", self.color(&scope.join(", "), "dim"))?;
        }

        let arrow = page.sort.direction.arrow();
        let (name_arrow, id_arrow) = match page.sort.field {
            SortField::Name => (arrow, ""),
            SortField::Id => ("", arrow),
        };
        let header = format!(
            "{:<12} {:<40} {}",
            format!("ID {id_arrow}"),
            format!("NAME {name_arrow}"),
            "OFFER"
        );
        writeln!(out, "{}", self.color(header.trim_end(), "bold"))?;

        if page.rows.is_empty() {
            writeln!(out, "{}", self.color("No products.", "dim"))?;
        }
        for row in &page.rows {
            writeln!(
                out,
                "{:<12} {:<40} {}",
                row.id.to_string(),
                row.name,
                self.offer_text(&row.offer)
            )?;
            self.write_providers(&mut out, &row.offer)?;
        }

        write!(
            out,
            "Page {} of {} ({} products)",
            page.page,
            page.total_pages.max(1),
            page.total_items
        )?;
        Ok(out)
    }

    fn render_quotes(&self, quotes: &[QuoteReport]) -> Result<String, ReportError> {
        let mut out = String::new();
        for quote in quotes {
            writeln!(
                out,
                "{:<12} {}",
                quote.product_id.to_string(),
                self.offer_text(&quote.status)
            )?;
            self.write_providers(&mut out, &quote.status)?;
        }
        Ok(out.trim_end().to_string())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}
