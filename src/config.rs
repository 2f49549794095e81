use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const DEFAULT_MASTER_LIST_URL: &str = "http://data.gdeltproject.org/gdeltv2/masterfilelist.txt";
pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".export.CSV.zip";

/// GDELT 2.0 only reaches back to 2015; a century is plenty.
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_master_list_url")]
    pub master_list_url: String,

    #[serde(default = "default_archive_suffix")]
    pub archive_suffix: String,

    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gdelt-ingest");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("news.db").to_string_lossy().to_string()
}

fn default_master_list_url() -> String {
    DEFAULT_MASTER_LIST_URL.to_string()
}

fn default_archive_suffix() -> String {
    DEFAULT_ARCHIVE_SUFFIX.to_string()
}

fn default_lookback_days() -> u32 {
    7
}

fn default_request_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("gdelt-ingest/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            master_list_url: default_master_list_url(),
            archive_suffix: default_archive_suffix(),
            lookback_days: default_lookback_days(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Loads the config from its default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            let config = Config::default();
            config.save_to(path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gdelt-ingest")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.archive_suffix.is_empty() {
            return Err(AppError::Config("archive_suffix must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(AppError::Config("timeouts must be at least one second".to_string()));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(AppError::Config(format!(
                "lookback_days must be at most {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        Ok(())
    }
}
