use crate::config::{Settings, TomlConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "stonewalker")]
#[command(about = "Stonewalker Oracle: ask about hidden places from the terminal")]
pub struct CliConfig {
    #[arg(long, env = "STONEWALKER_API_BASE", help = "Search backend base URL")]
    pub api_base: Option<String>,

    #[arg(long, env = "STONEWALKER_MAPS_API_KEY", hide_env_values = true)]
    pub maps_api_key: Option<String>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Ask the backend to bypass its cache")]
    pub force: bool,

    #[arg(long, help = "Start with the debug panel open")]
    pub debug: bool,

    #[arg(long, help = "Wait for the backend health check before prompting")]
    pub wait_for_backend: bool,

    #[arg(short, long, help = "Send a single query and exit")]
    pub query: Option<String>,

    #[arg(long, help = "Print one-shot results as JSON")]
    pub json: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 讀取 TOML (若有指定) 並套用命令列覆寫
    pub fn resolve(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path.display());
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };

        let mut settings = Settings::from_toml(&file);
        self.apply_to(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(api_base) = &self.api_base {
            settings.api_base = api_base.clone();
        }
        if let Some(key) = self.maps_api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            settings.maps_api_key = Some(key.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        settings.force |= self.force;
        settings.debug |= self.debug;
    }
}
