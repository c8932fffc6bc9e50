//! Configuration validation.

use super::types::{AppConfig, BackendConfig, PricingConfig, ViewConfig};

/// Largest page size accepted.
const MAX_PAGE_SIZE: usize = 500;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.backend.validate());
        errors.extend(self.view.validate());
        errors.extend(self.pricing.validate());
        errors
    }
}

impl Validatable for BackendConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ConfigError::new(
                "backend.base_url",
                format!("Unsupported scheme '{}', expected http or https", url.scheme()),
            )),
            Err(e) => errors.push(ConfigError::new(
                "backend.base_url",
                format!("Invalid URL '{}': {e}", self.base_url),
            )),
        }

        for (field, path) in [
            ("backend.products_path", &self.products_path),
            ("backend.categories_path", &self.categories_path),
            ("backend.price_path", &self.price_path),
        ] {
            if !path.starts_with('/') {
                errors.push(ConfigError::new(
                    field,
                    format!("Endpoint path must start with '/', got '{path}'"),
                ));
            }
        }

        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "backend.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }

        if let Some(fixture) = &self.fixture {
            if !fixture.exists() {
                errors.push(ConfigError::new(
                    "backend.fixture",
                    format!("Fixture file does not exist: {}", fixture.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for ViewConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            errors.push(ConfigError::new(
                "view.page_size",
                format!(
                    "Page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                    self.page_size
                ),
            ));
        }
        if self.banner_timeout_secs == Some(0) {
            errors.push(ConfigError::new(
                "view.banner_timeout_secs",
                "Banner timeout must be at least 1 second; omit it to keep messages",
            ));
        }
        errors
    }
}

impl Validatable for PricingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(user_type) = &self.user_type {
            if user_type.trim().is_empty() || user_type.chars().any(char::is_whitespace) {
                errors.push(ConfigError::new(
                    "pricing.user_type",
                    format!("User type must be a single word, got '{user_type}'"),
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_bad_base_url() {
        let config = AppConfig::builder().base_url("not a url").build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "backend.base_url");

        let config = AppConfig::builder().base_url("ftp://example.com").build();
        assert!(!config.is_valid());
    }

    #[test]
    fn test_zero_page_size_and_timeout() {
        let config = AppConfig::builder().page_size(0).timeout_secs(0).build();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["backend.timeout_secs", "view.page_size"]);
    }

    #[test]
    fn test_endpoint_paths_need_slash() {
        let mut config = AppConfig::default();
        config.backend.price_path = "price".to_string();
        let errors = config.validate();
        assert_eq!(errors[0].field, "backend.price_path");
        assert!(errors[0].to_string().starts_with("backend.price_path: "));
    }

    #[test]
    fn test_user_type_single_word() {
        let config = AppConfig::builder().user_type("big dealer").build();
        assert!(!config.is_valid());
        assert!(AppConfig::builder().user_type("dealer").build().is_valid());
    }
}
