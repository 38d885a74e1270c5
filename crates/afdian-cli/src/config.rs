/*
[INPUT]:  YAML configuration file, AFDIAN_* environment variables
[OUTPUT]: Parsed CLI configuration
[POS]:    Configuration layer - credentials and cache setup
[UPDATE]: When adding new configuration options
*/

use afdian_client::{ClientConfig, Credentials, DEFAULT_API_ROOT, ResourceKind};
use serde::{Deserialize, Serialize};

pub const ENV_USER_ID: &str = "AFDIAN_USER_ID";
pub const ENV_TOKEN: &str = "AFDIAN_TOKEN";

/// Top-level configuration for the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Creator user id from the developer page
    #[serde(default)]
    pub user_id: String,
    /// API token from the developer page
    #[serde(default)]
    pub token: String,
    /// Override for the open API root
    #[serde(default)]
    pub api_root: Option<String>,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Cache configuration; backends are descriptor strings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry lifetime, 0 disables caching
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// File path or `&redis=host:port`
    #[serde(default = "default_orders_cache")]
    pub orders: String,
    #[serde(default = "default_sponsors_cache")]
    pub sponsors: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            orders: default_orders_cache(),
            sponsors: default_sponsors_cache(),
        }
    }
}

fn default_ttl_seconds() -> u64 {
    120
}

fn default_orders_cache() -> String {
    ResourceKind::Orders.default_cache_file().to_string()
}

fn default_sponsors_cache() -> String {
    ResourceKind::Sponsors.default_cache_file().to_string()
}

impl AppConfig {
    /// Load configuration from YAML file, then apply environment overrides
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.override_credentials(
            std::env::var(ENV_USER_ID).ok(),
            std::env::var(ENV_TOKEN).ok(),
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Replace credentials with any non-empty override
    pub fn override_credentials(&mut self, user_id: Option<String>, token: Option<String>) {
        if let Some(user_id) = user_id.filter(|value| !value.is_empty()) {
            self.user_id = user_id;
        }
        if let Some(token) = token.filter(|value| !value.is_empty()) {
            self.token = token;
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.user_id.clone(), self.token.clone())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_root: self
                .api_root
                .clone()
                .unwrap_or_else(|| DEFAULT_API_ROOT.to_string()),
            ..ClientConfig::default()
        }
    }
}
