use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const API_URL_ENV: &str = "HR_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrConfig {
    /// Base URL of the HR API including its prefix, e.g. "http://localhost:5000/api"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Where downloaded salary slips go. Defaults to the user's download dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            download_dir: None,
        }
    }
}

pub fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("hr-tui"))
}

impl HrConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(root_path()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(root_path()?.join("hr-tui.log"))
    }

    /// Load config from disk, then apply `HR_API_URL` if set. Returns the
    /// default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::parse(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(&url);
        }
        Ok(config)
    }

    fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_api_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_url = url.to_string();
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
