#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, OutputFormat};
pub use toml_config::{DirectoryConfig, DisplayConfig, MapConfig};

pub const API_KEY_ENV: &str = "RESOURCES_API_KEY";
pub const BASE_ID_ENV: &str = "RESOURCES_BASE_ID";
pub const ENDPOINT_ENV: &str = "RESOURCES_API_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// 紀錄庫連線設定
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub api_key: String,
    pub base_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl StoreConfig {
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            endpoint: default_endpoint(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// 從環境變數讀取 (RESOURCES_API_KEY, RESOURCES_BASE_ID)
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_ENV).ok();
        let base_id = env::var(BASE_ID_ENV).ok();

        let mut config = Self::new(
            validation::validate_required_field(API_KEY_ENV, &api_key)?.clone(),
            validation::validate_required_field(BASE_ID_ENV, &base_id)?.clone(),
        );
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("store.api_key", &self.api_key)?;
        validation::validate_non_empty_string("store.base_id", &self.base_id)?;
        validation::validate_url("store.endpoint", &self.endpoint)?;
        validation::validate_positive_number("store.timeout_seconds", self.timeout_seconds, 1)?;

        // 未替換的 ${VAR} 代表環境變數沒有設定
        for (field, value) in [
            ("store.api_key", &self.api_key),
            ("store.base_id", &self.base_id),
        ] {
            if value.contains("${") {
                return Err(DirectoryError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Unresolved environment placeholder".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_validation() {
        let config = StoreConfig::new("key", "appBase");
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(30));

        assert!(StoreConfig::new("", "appBase").validate().is_err());
        assert!(StoreConfig::new("key", "appBase")
            .with_endpoint("not a url")
            .validate()
            .is_err());
        assert!(StoreConfig::new("${RESOURCES_API_KEY}", "appBase")
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", StoreConfig::new("secret-key", "appBase"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("appBase"));
    }
}
