//! CLI configuration.

use anyhow::{Context, Result};
use cart_core::CartConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local cart storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Offline catalog fixture.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Cart behaviour and notification messages.
    #[serde(default)]
    pub cart: CartConfig,
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
}

/// Catalog API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL (default: http://localhost:3333).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Stock route prefix; records are read from `{stock_path}/{id}`.
    #[serde(default = "default_stock_path")]
    pub stock_path: String,

    /// Product route prefix; records are read from `{products_path}/{id}`.
    #[serde(default = "default_products_path")]
    pub products_path: String,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_stock_path() -> String {
    "/stock".to_string()
}

fn default_products_path() -> String {
    "/products".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stock_path: default_stock_path(),
            products_path: default_products_path(),
        }
    }
}

/// Where the cart is kept between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per stored key.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".cart".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Offline catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file with `products` and `stock` arrays. When set, lookups are
    /// answered from it instead of the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<String>,
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    let cart = CartConfig::default();
    format!(
        r#"# Cart configuration

[api]
base_url = "{base_url}"
stock_path = "{stock_path}"
products_path = "{products_path}"

[storage]
dir = "{dir}"

[catalog]
# Serve lookups from a local file instead of the API
# fixture = "db.json"

[cart]
storage_key = "{storage_key}"

[cart.messages]
out_of_stock = "{out_of_stock}"
add_failed = "{add_failed}"
remove_failed = "{remove_failed}"
update_failed = "{update_failed}"
"#,
        base_url = default_base_url(),
        stock_path = default_stock_path(),
        products_path = default_products_path(),
        dir = default_storage_dir(),
        storage_key = cart.storage_key,
        out_of_stock = cart.messages.out_of_stock,
        add_failed = cart.messages.add_failed,
        remove_failed = cart.messages.remove_failed,
        update_failed = cart.messages.update_failed,
    )
}
