//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["atelier.toml", ".atelier.toml", "atelier.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart storage configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Product catalog configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Storage key of the cart slot, including the session suffix if any.
    pub fn cart_key(&self, session: Option<&str>) -> String {
        match session.or(self.store.session.as_deref()) {
            Some(session) if !session.trim().is_empty() => {
                atelier_store::cache_key!(self.store.key.as_str(), session.trim())
            }
            _ => self.store.key.clone(),
        }
    }
}

/// Where the cart lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory of the file-backed key-value store.
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Storage key of the cart slot.
    #[serde(default = "default_store_key")]
    pub key: String,

    /// Default shopper session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

fn default_store_path() -> String {
    ".atelier/store".to_string()
}

fn default_store_key() -> String {
    atelier_commerce::cart::CART_STORAGE_KEY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            key: default_store_key(),
            session: None,
        }
    }
}

/// Where products come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file holding the product list.
    #[serde(default = "default_catalog_path")]
    pub path: String,

    /// Sort applied by `catalog list` when none is given.
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_catalog_path() -> String {
    "data/products.json".to_string()
}

fn default_sort() -> String {
    "default".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            default_sort: default_sort(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level filter; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Generate a default atelier.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Atelier storefront configuration

[store]
path = "{store_path}"
key = "{store_key}"
# session = "guest"

[catalog]
path = "{catalog_path}"
# default, price-asc, price-desc, name-asc, name-desc
default_sort = "default"

[log]
level = "warn"
"#,
        store_path = default_store_path(),
        store_key = default_store_key(),
        catalog_path = default_catalog_path(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CliConfig = toml::from_str("[store]\nsession = \"alice\"\n").unwrap();
        assert_eq!(config.store.path, ".atelier/store");
        assert_eq!(config.store.key, "shoppingCart");
        assert_eq!(config.catalog.path, "data/products.json");
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_cart_key() {
        let mut config = CliConfig::default();
        assert_eq!(config.cart_key(None), "shoppingCart");
        assert_eq!(config.cart_key(Some("bob")), "shoppingCart:bob");
        assert_eq!(config.cart_key(Some("  ")), "shoppingCart");

        config.store.session = Some("alice".to_string());
        assert_eq!(config.cart_key(None), "shoppingCart:alice");
        assert_eq!(config.cart_key(Some("bob")), "shoppingCart:bob");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.catalog.default_sort = "price-desc".to_string();

        for name in ["atelier.toml", "atelier.json"] {
            let path = dir.path().join(name);
            let path = path.to_str().unwrap();
            config.save(path).unwrap();
            assert_eq!(CliConfig::load(path).unwrap(), config);
        }
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atelier.toml");
        std::fs::write(&path, "[store\n").unwrap();

        let err = CliConfig::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML config"));
    }
}
