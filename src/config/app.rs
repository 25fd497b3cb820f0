//! Application configuration loaded from `config.toml`.
//!
//! Every setting has a default, so the file is optional; a missing file yields
//! [`AppConfig::default`]. The database URL can additionally be overridden with
//! the `DATABASE_URL` environment variable.

use crate::config::database::{DEFAULT_DATABASE_URL, get_database_url};
use crate::core::{dashboard::DashboardOptions, product::MAX_ID_LEN, store::DEFAULT_ID_PREFIX};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// `[database]` section
    pub database: DatabaseSettings,
    /// `[inventory]` section
    pub inventory: InventorySettings,
    /// `[dashboard]` section
    pub dashboard: DashboardSettings,
    /// `[report]` section
    pub report: ReportSettings,
}

/// Where the inventory is persisted
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    /// `SeaORM` connection URL
    pub url: String,
}

/// Record store settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct InventorySettings {
    /// Prefix for generated product ids
    pub id_prefix: String,
}

/// Dashboard panel settings
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettings {
    /// Size of the "most stocked" ranking
    pub top_n: usize,
    /// Quantity at or below which a product counts as low stock
    pub low_stock_threshold: u32,
}

/// PDF report settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Report heading
    pub title: String,
    /// Symbol prefixed to money amounts
    pub currency_symbol: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        let options = DashboardOptions::default();
        Self {
            top_n: options.top_n,
            low_stock_threshold: options.low_stock_threshold,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Inventory Report".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl DashboardSettings {
    /// Converts the settings into dashboard options.
    #[must_use]
    pub const fn options(&self) -> DashboardOptions {
        DashboardOptions {
            top_n: self.top_n,
            low_stock_threshold: self.low_stock_threshold,
        }
    }
}

impl AppConfig {
    /// Database URL after applying the `DATABASE_URL` override.
    #[must_use]
    pub fn database_url(&self) -> String {
        get_database_url(&self.database.url)
    }

    fn validate(self) -> Result<Self> {
        let prefix = self.inventory.id_prefix.trim();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config {
                message: format!(
                    "inventory.id_prefix must be non-empty and contain no whitespace (got '{}')",
                    self.inventory.id_prefix
                ),
            });
        }
        // Generated ids look like `<prefix>-0001`
        let longest_prefix = MAX_ID_LEN - 5;
        if prefix.chars().count() > longest_prefix {
            return Err(Error::Config {
                message: format!(
                    "inventory.id_prefix cannot be longer than {longest_prefix} characters \
                     (got {})",
                    prefix.chars().count()
                ),
            });
        }
        Ok(self)
    }
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is invalid, contains unknown keys or
/// holds an unusable id prefix.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value is unusable
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `path` if given, else from `./config.toml` when present,
/// else falls back to defaults.
///
/// An explicitly requested file must exist.
///
/// # Errors
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_app_configuration(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return load_config(path);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_config(default_path)
    } else {
        info!("No {DEFAULT_CONFIG_PATH} found; using default configuration");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [database]
            url = "sqlite://stock/test.sqlite?mode=rwc"

            [inventory]
            id_prefix = "SKU"

            [dashboard]
            top_n = 3
            low_stock_threshold = 2

            [report]
            title = "Warehouse A"
            currency_symbol = "€"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.database.url, "sqlite://stock/test.sqlite?mode=rwc");
        assert_eq!(config.inventory.id_prefix, "SKU");
        assert_eq!(
            config.dashboard.options(),
            DashboardOptions {
                top_n: 3,
                low_stock_threshold: 2
            }
        );
        assert_eq!(config.report.title, "Warehouse A");
        assert_eq!(config.report.currency_symbol, "€");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config("[dashboard]\ntop_n = 5\n").unwrap();
        assert_eq!(config.dashboard.top_n, 5);
        assert_eq!(config.dashboard.low_stock_threshold, 5);
        assert_eq!(config.inventory.id_prefix, "PROD");
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.report, ReportSettings::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = parse_config("[dashboard]\ntop = 5\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_blank_id_prefix_is_rejected() {
        let result = parse_config("[inventory]\nid_prefix = \" \"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_id_prefix_must_leave_room_for_sequence() {
        let longest = "X".repeat(MAX_ID_LEN - 5);
        let config = parse_config(&format!("[inventory]\nid_prefix = \"{longest}\"\n")).unwrap();
        assert_eq!(config.inventory.id_prefix, longest);

        let too_long = "X".repeat(MAX_ID_LEN - 4);
        let result = parse_config(&format!("[inventory]\nid_prefix = \"{too_long}\"\n"));
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("longer than 27")));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_app_configuration(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
