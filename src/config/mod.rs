//! Configuration for parts-quote.
//!
//! Settings come from a YAML file (discovered or given with `--config`),
//! a named preset, and CLI arguments, in increasing precedence.
//!
//! ```yaml
//! backend:
//!   base_url: http://localhost:5173/api
//! view:
//!   page_size: 15
//! pricing:
//!   user_type: dealer
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEVELOPMENT_BASE_URL,
    PRODUCTION_BASE_URL,
};
pub use types::{AppConfig, AppConfigBuilder, BackendConfig, PricingConfig, ViewConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, ConfigOverrides,
};

/// JSON Schema of the config file format, for editor completion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema();
        assert!(schema.contains("\"backend\""));
        assert!(schema.contains("\"page_size\""));
        assert!(schema.contains("\"user_type\""));
    }
}
