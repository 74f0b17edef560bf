//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cart_cache::{Cache, FileStore};
use cart_core::memory::{CatalogFixture, InMemoryCatalog};
use cart_core::{CartStore, Collaborators};
use cart_data::{FetchClient, HttpCatalog};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Config file the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::find_config(&cwd),
        };

        let config = match &config_path {
            Some(path) => {
                let path = path.to_str().context("Config path is not valid UTF-8")?;
                CliConfig::load(path)?
            }
            None => CliConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Build the cart store described by the configuration.
    ///
    /// Lookups come from the fixture file when one is configured, otherwise
    /// from the catalog API.
    pub fn open_store(&self) -> Result<CartStore> {
        let storage_dir = self.resolve_path(&self.config.storage.dir);
        let store = FileStore::open(&storage_dir)
            .with_context(|| format!("Failed to open cart storage: {}", storage_dir.display()))?;
        let storage = Cache::new(store);
        let notifier = Arc::new(self.output.clone());

        let collaborators = match &self.config.catalog.fixture {
            Some(fixture) => {
                let path = self.resolve_path(fixture);
                self.output
                    .debug(&format!("Using catalog fixture: {}", path.display()));
                Collaborators::new(Arc::new(load_fixture(&path)?), storage, notifier)
            }
            None => {
                let api = &self.config.api;
                self.output
                    .debug(&format!("Using catalog API: {}", api.base_url));
                let client = FetchClient::reqwest().with_base_url(api.base_url.clone());
                let catalog = HttpCatalog::new(client)
                    .with_paths(api.stock_path.clone(), api.products_path.clone());
                Collaborators::new(Arc::new(catalog), storage, notifier)
            }
        };

        CartStore::open(collaborators, self.config.cart.clone())
            .context("Failed to load the saved cart")
    }
}

fn load_fixture(path: &Path) -> Result<InMemoryCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog fixture: {}", path.display()))?;
    let fixture: CatalogFixture = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog fixture: {}", path.display()))?;
    Ok(InMemoryCatalog::from_fixture(fixture))
}
