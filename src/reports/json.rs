//! JSON reporter.

use super::{OutputFormat, PageReport, QuoteReport, ReportError, Reporter};
use crate::model::CategoryNode;
use serde::Serialize;

/// JSON reporter
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn render_categories(&self, tree: &CategoryNode) -> Result<String, ReportError> {
        self.to_json(&tree.children)
    }

    fn render_page(&self, page: &PageReport) -> Result<String, ReportError> {
        self.to_json(page)
    }

    fn render_quotes(&self, quotes: &[QuoteReport]) -> Result<String, ReportError> {
        self.to_json(quotes)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;
    use crate::reports::OfferStatus;

    #[test]
    fn test_quotes_are_flat_objects() {
        let quotes = vec![
            QuoteReport {
                product_id: ProductId::Number(42),
                status: OfferStatus::OutOfStock {
                    message: "No provider cost found for product id 42".into(),
                },
            },
            QuoteReport {
                product_id: ProductId::Number(7),
                status: OfferStatus::Quoted {
                    customer_price: 89.9,
                    dealer_price: None,
                    provider: "foneday".into(),
                    minutes_remaining: Some(3),
                    providers: None,
                },
            },
        ];
        let out = JsonReporter::new().pretty(false).render_quotes(&quotes).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["state"], "out_of_stock");
        assert_eq!(value[0]["product_id"], 42);
        assert_eq!(value[1]["minutes_remaining"], 3);
        assert!(value[1].get("dealer_price").is_none());
    }

    #[test]
    fn test_categories_skip_implicit_root() {
        let tree = CategoryNode::root(vec![CategoryNode::leaf("Phones")]);
        let out = JsonReporter::new().pretty(false).render_categories(&tree).unwrap();
        assert_eq!(out, r#"[{"name":"Phones","children":[]}]"#);
    }
}
