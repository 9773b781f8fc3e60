//! Configuration Management
//!
//! Handles persistent configuration storage for vra-state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configured host
pub const HOST_ENV: &str = "VRA_HOST";

/// Environment variable overriding the configured token
pub const TOKEN_ENV: &str = "VRA_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// vRA appliance URL
    #[serde(default)]
    pub host: Option<String>,
    /// Pre-issued bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Last used state file
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vra-state").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective host (CLI > environment > config)
    pub fn effective_host(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, std::env::var(HOST_ENV).ok(), self.host.as_deref())
    }

    /// Get effective token (CLI > environment > config)
    pub fn effective_token(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, std::env::var(TOKEN_ENV).ok(), self.token.as_deref())
    }

    /// Get effective state file (CLI > config > default)
    pub fn effective_state_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.state_path.clone())
            .unwrap_or_else(|| PathBuf::from(crate::state::DEFAULT_STATE_FILE))
    }
}

fn pick(cli: Option<&str>, env: Option<String>, config: Option<&str>) -> Option<String> {
    cli.map(String::from)
        .or(env)
        .or_else(|| config.map(String::from))
        .filter(|s| !s.trim().is_empty())
}
