//! Application configuration loaded from `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::settings::DEFAULT_TOTAL_LEAVES;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const API_TOKEN_ENV: &str = "LEAVE_PLANNER_API_TOKEN";

/// Which store the planner talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    pub database_path: String,
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub default_total_leaves: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            database_path: default_database_path().to_string_lossy().to_string(),
            api_base_url: None,
            api_token: None,
            default_total_leaves: DEFAULT_TOTAL_LEAVES,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "KenBoyle", "LeavePlanner")
}

/// `planner.db` in the platform data directory.
pub fn default_database_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join("planner.db"),
        None => PathBuf::from("planner.db"),
    }
}

/// `config.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl AppConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults. The API token from the
    /// environment always takes precedence over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                log::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.api_token = Some(token);
            }
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// API root for the HTTP backend.
    pub fn require_api_base_url(&self) -> Result<&str> {
        self.api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("backend = \"http\" requires api_base_url")
    }
}
