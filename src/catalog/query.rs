//! Server-side product query built from the view state.

use crate::model::CategoryPath;

/// Parameters of one product-list request.
///
/// Only the search term and the committed category path go to the backend;
/// name and id substring filters stay local.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductQuery {
    pub search_term: Option<String>,
    pub category: CategoryPath,
}

impl ProductQuery {
    pub fn new(search_term: &str, category: CategoryPath) -> Self {
        let trimmed = search_term.trim();
        Self {
            search_term: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            category,
        }
    }

    /// The unfiltered catalog.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Query parameters in request order: `name`, then `category1..N`.
    #[must_use]
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.category.len() + 1);
        if let Some(term) = &self.search_term {
            params.push(("name".to_string(), term.clone()));
        }
        params.extend(self.category.query_params());
        params
    }

    /// Query string without the leading `?`, for logs.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.query_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_params() {
        let query = ProductQuery::new("", CategoryPath::from_segments(["Phones", "iPhone"]));
        assert_eq!(query.to_query_string(), "category1=Phones&category2=iPhone");
    }

    #[test]
    fn test_search_term_first_and_trimmed() {
        let query = ProductQuery::new("  display ", CategoryPath::from_segments(["Phones"]));
        assert_eq!(query.to_query_string(), "name=display&category1=Phones");
    }

    #[test]
    fn test_blank_search_is_absent() {
        assert_eq!(ProductQuery::new("   ", CategoryPath::root()), ProductQuery::all());
    }
}
