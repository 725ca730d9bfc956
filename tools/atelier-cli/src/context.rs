//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use atelier_commerce::catalog::Catalog;
use atelier_commerce::cart::CartStore;
use atelier_store::FileStore;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file the configuration came from, if any.
    pub config_file: Option<PathBuf>,
    /// Session given on the command line.
    pub session: Option<String>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, session: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_file) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_file,
            session,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Storage key of the cart slot for this invocation.
    pub fn cart_key(&self) -> String {
        self.config.cart_key(self.session.as_deref())
    }

    /// Open the file-backed cart store.
    pub fn cart_store(&self) -> Result<CartStore<FileStore>> {
        let root = self.resolve_path(&self.config.store.path);
        let backend = FileStore::open(&root)
            .with_context(|| format!("Failed to open cart store: {}", root.display()))?;

        let key = self.cart_key();
        tracing::debug!(root = %root.display(), key = %key, "Opened cart store");
        Ok(CartStore::with_key(backend, key))
    }

    /// Load the product catalog.
    pub fn catalog(&self) -> Result<Catalog> {
        let path = self.resolve_path(&self.config.catalog.path);
        Catalog::load(&path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(dir: &Path, config: CliConfig) -> Context {
        Context {
            config,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
            config_file: None,
            session: None,
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(".atelier.toml"),
            "[store]\nkey = \"tabCart\"\n",
        )
        .unwrap();

        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(config.store.key, "tabCart");
        assert_eq!(path, dir.path().join(".atelier.toml"));
    }

    #[test]
    fn test_cart_store_uses_session_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path(), CliConfig::default());
        ctx.session = Some("guest".to_string());

        let store = ctx.cart_store().unwrap();
        assert_eq!(store.key(), "shoppingCart:guest");
        assert!(store.add_to_cart("p1", 1, "Tee", 25.0, None).is_changed());

        ctx.session = None;
        assert_eq!(ctx.cart_store().unwrap().get_cart_item_count(), 0);
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path(), CliConfig::default());
        assert!(ctx.catalog().is_err());
    }
}
