use crate::core::map::{MAX_ZOOM, MIN_ZOOM};
use crate::utils::error::{Result, StonewalkerError};
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub map: MapSection,
    #[serde(default)]
    pub chat: ChatSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSection {
    pub api_key: Option<String>,
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSection {
    pub debug: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"))
}

/// 還有 ${VAR} 沒被替換，代表環境變數不存在
pub fn is_unresolved(value: &str) -> bool {
    env_var_pattern().is_match(value)
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StonewalkerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StonewalkerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STONEWALKER_MAPS_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            validate_url("api.base_url", base_url)?;
        }
        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some([lat, lng]) = self.map.center {
            validate_range("map.center.lat", lat, -90.0, 90.0)?;
            validate_range("map.center.lng", lng, -180.0, 180.0)?;
        }
        if let Some(zoom) = self.map.zoom {
            validate_range("map.zoom", zoom, MIN_ZOOM, MAX_ZOOM)?;
        }
        Ok(())
    }
}
