use crate::config::toml_config::{is_unresolved, TomlConfig};
use crate::core::map::{Viewport, MAX_ZOOM, MIN_ZOOM};
use crate::domain::model::{DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 合併後的最終設定：CLI / 環境變數 > TOML > 預設值
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub maps_api_key: Option<String>,
    pub timeout_seconds: u64,
    pub force: bool,
    pub debug: bool,
    pub viewport: Viewport,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            maps_api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            force: false,
            debug: false,
            viewport: Viewport::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(file: &TomlConfig) -> Self {
        let defaults = Self::default();

        let maps_api_key = file.map.api_key.clone().filter(|key| {
            if is_unresolved(key) {
                tracing::warn!("map.api_key references an unset environment variable, ignoring");
                false
            } else {
                !key.trim().is_empty()
            }
        });

        Self {
            api_base: file.api.base_url.clone().unwrap_or(defaults.api_base),
            maps_api_key,
            timeout_seconds: file.api.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            force: file.api.force.unwrap_or(defaults.force),
            debug: file.chat.debug.unwrap_or(defaults.debug),
            viewport: Viewport {
                center: file
                    .map
                    .center
                    .map(|[lat, lng]| (lat, lng))
                    .unwrap_or(DEFAULT_CENTER),
                zoom: file.map.zoom.unwrap_or(DEFAULT_ZOOM),
            },
        }
    }
}

impl ConfigProvider for Settings {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn maps_api_key(&self) -> Option<&str> {
        self.maps_api_key.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn force_refresh(&self) -> bool {
        self.force
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_range("zoom", self.viewport.zoom, MIN_ZOOM, MAX_ZOOM)?;
        if let Some(key) = &self.maps_api_key {
            validate_non_empty_string("maps_api_key", key)?;
        }
        Ok(())
    }
}
