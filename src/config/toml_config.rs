use crate::config::StoreConfig;
use crate::core::pagination::PageSize;
use crate::domain::model::Coordinates;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_size() -> usize {
    PageSize::DEFAULT.value()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

impl DisplayConfig {
    pub fn page_size(&self) -> PageSize {
        PageSize::Fixed(self.default_page_size)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// 沒有任何地址座標時使用的地圖中心
    pub fallback_center: Option<Coordinates>,
}

impl DirectoryConfig {
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store,
            display: DisplayConfig::default(),
            map: MapConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DirectoryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DirectoryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RESOURCES_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DirectoryError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for DirectoryConfig {
    fn validate(&self) -> Result<()> {
        self.store.validate()?;
        validation::validate_positive_number(
            "display.default_page_size",
            self.display.default_page_size as u64,
            1,
        )?;

        if let Some(center) = self.map.fallback_center {
            validation::validate_range(
                "map.fallback_center.latitude",
                center.latitude,
                -90.0,
                90.0,
            )?;
            validation::validate_range(
                "map.fallback_center.longitude",
                center.longitude,
                -180.0,
                180.0,
            )?;
        }
        Ok(())
    }
}
