//! Presets and default values.

use super::types::{AppConfig, BackendConfig};

/// Public API host of the production shop.
pub const PRODUCTION_BASE_URL: &str = "https://api.koelnhandyreparatur.de";

/// Local dev server proxying the API under `/api`.
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5173/api";

pub const DEFAULT_BASE_URL: &str = PRODUCTION_BASE_URL;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named deployment presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigPreset {
    /// The public shop API
    #[value(alias = "prod")]
    Production,
    /// A local dev server with the API behind `/api`
    #[value(alias = "dev")]
    Development,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" | "local" => Some(Self::Development),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Production => "Talk to the public shop API",
            Self::Development => "Talk to a local dev server proxying /api",
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Development => DEVELOPMENT_BASE_URL,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Production, Self::Development]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self {
            backend: BackendConfig {
                base_url: preset.base_url().to_string(),
                ..BackendConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(ConfigPreset::from_name("dev"), Some(ConfigPreset::Development));
        assert_eq!(ConfigPreset::from_name("staging"), None);
    }

    #[test]
    fn test_development_preset_uses_proxy() {
        let config = AppConfig::from_preset(ConfigPreset::Development);
        assert_eq!(config.backend.base_url, "http://localhost:5173/api");
        assert_eq!(config.backend.products_path, "/products");
    }

    #[test]
    fn test_production_is_default() {
        assert_eq!(AppConfig::from_preset(ConfigPreset::Production), AppConfig::default());
    }
}
