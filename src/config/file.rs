//! Configuration file loading and discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".parts-quote.yaml",
    ".parts-quote.yml",
    "parts-quote.yaml",
    "parts-quote.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/parts-quote/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    let app_config_dir = dirs::config_dir().map(|dir| dir.join("parts-quote"));

    cwd.into_iter()
        .chain(find_git_root())
        .chain(app_config_dir)
        .chain(dirs::home_dir())
        .find_map(|dir| find_config_in_dir(&dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// Used to layer a config file over a preset. Command-line values go
    /// through [`Self::apply_overrides`] instead, since a flag that happens
    /// to equal a default must still win.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        let backend = &other.backend;
        if backend.base_url != defaults.backend.base_url {
            self.backend.base_url.clone_from(&backend.base_url);
        }
        if backend.products_path != defaults.backend.products_path {
            self.backend.products_path.clone_from(&backend.products_path);
        }
        if backend.categories_path != defaults.backend.categories_path {
            self.backend
                .categories_path
                .clone_from(&backend.categories_path);
        }
        if backend.price_path != defaults.backend.price_path {
            self.backend.price_path.clone_from(&backend.price_path);
        }
        if backend.timeout_secs != defaults.backend.timeout_secs {
            self.backend.timeout_secs = backend.timeout_secs;
        }
        if backend.fixture.is_some() {
            self.backend.fixture.clone_from(&backend.fixture);
        }

        let view = &other.view;
        if view.page_size != defaults.view.page_size {
            self.view.page_size = view.page_size;
        }
        if view.sort_field != defaults.view.sort_field {
            self.view.sort_field = view.sort_field;
        }
        if view.sort_direction != defaults.view.sort_direction {
            self.view.sort_direction = view.sort_direction;
        }
        if view.banner_timeout_secs.is_some() {
            self.view.banner_timeout_secs = view.banner_timeout_secs;
        }

        if other.pricing.user_type.is_some() {
            self.pricing.user_type.clone_from(&other.pricing.user_type);
        }
        if other.pricing.password.is_some() {
            self.pricing.password.clone_from(&other.pricing.password);
        }
    }

    /// Apply command-line values; every one that is set wins.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.base_url {
            self.backend.base_url.clone_from(url);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.backend.timeout_secs = secs;
        }
        if overrides.fixture.is_some() {
            self.backend.fixture.clone_from(&overrides.fixture);
        }
        if let Some(size) = overrides.page_size {
            self.view.page_size = size;
        }
        if overrides.user_type.is_some() {
            self.pricing.user_type.clone_from(&overrides.user_type);
        }
        if overrides.password.is_some() {
            self.pricing.password.clone_from(&overrides.password);
        }
    }

    /// Load from file and apply CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.apply_overrides(cli_overrides);
        (config, loaded_from)
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub fixture: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub user_type: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Default config serialized as YAML, with a short header.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# parts-quote configuration
# Place this file at .parts-quote.yaml in your project root or ~/.config/parts-quote/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Commented example config listing every option.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# parts-quote configuration file
# =================================
#
# Place it at:
#   - .parts-quote.yaml in your project root
#   - ~/.config/parts-quote/parts-quote.yaml for global config
#
# CLI arguments always override file settings.

# Catalog backend
backend:
  base_url: https://api.koelnhandyreparatur.de
  products_path: /products
  categories_path: /categories
  price_path: /price
  # Request timeout in seconds
  timeout_secs: 30
  # Browse an offline catalog instead of the network
  # fixture: ./catalog.json

# Product list
view:
  page_size: 10
  # name or id
  sort_field: name
  # ascending or descending
  sort_direction: ascending
  # Hide error messages after N seconds
  # banner_timeout_secs: 10

# Pricing context sent with every price request
# pricing:
#   user_type: dealer
#   password: secret
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SortDirection, SortField};
    use crate::config::{ConfigPreset, DEFAULT_TIMEOUT_SECS, PRODUCTION_BASE_URL};
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".parts-quote.yaml");
        std::fs::write(&config_path, "view:\n  page_size: 15\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_dotfile() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("parts-quote.yml"), "").unwrap();
        std::fs::write(tmp.path().join(".parts-quote.yml"), "").unwrap();

        assert_eq!(
            find_config_in_dir(tmp.path()),
            Some(tmp.path().join(".parts-quote.yml"))
        );
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let yaml = r"
backend:
  base_url: http://localhost:8080
  timeout_secs: 5
view:
  page_size: 15
  sort_field: id
  sort_direction: descending
pricing:
  user_type: dealer
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.backend.price_path, "/price");
        assert_eq!(config.view.page_size, 15);
        assert_eq!(config.view.sort_field, SortField::Id);
        assert_eq!(config.view.sort_direction, SortDirection::Descending);
        assert_eq!(config.pricing.user_type.as_deref(), Some("dealer"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_bad_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "view:\n  page_size: many\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::builder()
            .base_url("http://file-host")
            .page_size(15)
            .user_type("retail")
            .build();
        let overrides = AppConfig::builder()
            .user_type("dealer")
            .password("s3cret")
            .build();

        base.merge(&overrides);

        assert_eq!(base.backend.base_url, "http://file-host");
        assert_eq!(base.view.page_size, 15);
        assert_eq!(base.pricing.user_type.as_deref(), Some("dealer"));
        assert_eq!(base.pricing.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_overrides_win_even_when_equal_to_default() {
        let mut config = AppConfig::from_preset(ConfigPreset::Development);
        config.backend.timeout_secs = 5;

        config.apply_overrides(&ConfigOverrides {
            base_url: Some(PRODUCTION_BASE_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.backend.base_url, PRODUCTION_BASE_URL);
        assert_eq!(config.backend.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unset_overrides_keep_file_values() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("parts-quote.yaml");
        std::fs::write(&config_path, "backend:\n  timeout_secs: 12\nview:\n  page_size: 15\n").unwrap();

        let (config, loaded_from) = AppConfig::from_file_with_overrides(
            Some(&config_path),
            &ConfigOverrides {
                page_size: Some(10),
                ..ConfigOverrides::default()
            },
        );

        assert_eq!(loaded_from.as_deref(), Some(config_path.as_path()));
        assert_eq!(config.backend.timeout_secs, 12);
        assert_eq!(config.view.page_size, 10);
    }

    #[test]
    fn test_generate_example_config_parses() {
        let example = generate_example_config();
        assert!(example.contains("backend:"));
        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());

        let full: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(full, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "view:\n  page_size: 20\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
