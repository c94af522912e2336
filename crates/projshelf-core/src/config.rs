/// Application preferences — a small JSON file in the platform config
/// directory.
///
/// Missing file: defaults are written. Corrupt file: a warning is logged
/// and defaults are used, so a bad edit never prevents startup.
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::workspace::DEFAULT_ROOT;

const CONFIG_FILE: &str = "config.json";

/// Persisted preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Workspace root override; `None` uses `projects/` relative to the
    /// working directory.
    pub workspace_root: Option<PathBuf>,
    /// `true` = dark theme.
    pub dark_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            dark_mode: true,
        }
    }
}

impl AppConfig {
    /// The effective workspace root directory.
    pub fn resolve_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
    }
}

/// Platform-specific configuration directory.
pub fn config_directory() -> Option<PathBuf> {
    ProjectDirs::from("io", "projshelf", "ProjShelf")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Full path of the configuration file.
pub fn config_file_path() -> Option<PathBuf> {
    config_directory().map(|dir| dir.join(CONFIG_FILE))
}

/// Load preferences, falling back to defaults on any failure.
pub fn load_config() -> AppConfig {
    let Some(path) = config_file_path() else {
        tracing::warn!("could not determine config directory; using defaults");
        return AppConfig::default();
    };

    if !path.exists() {
        let config = AppConfig::default();
        if let Err(e) = save_config(&config) {
            tracing::warn!("could not write default config: {e:#}");
        }
        return config;
    }

    match fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|s| serde_json::from_str::<AppConfig>(&s).map_err(Into::into))
    {
        Ok(config) => {
            tracing::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!(
                "failed to load config from {}: {e:#}; using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// Save preferences to the config file, creating the directory if needed.
pub fn save_config(config: &AppConfig) -> Result<()> {
    let dir = config_directory().context("could not determine config directory")?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating config directory {}", dir.display()))?;

    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("saved config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_relative_projects_root() {
        let config = AppConfig::default();
        assert!(config.dark_mode);
        assert_eq!(config.resolve_root(), PathBuf::from("projects"));
    }

    #[test]
    fn root_override_wins() {
        let config = AppConfig {
            workspace_root: Some(PathBuf::from("/srv/work")),
            dark_mode: false,
        };
        assert_eq!(config.resolve_root(), PathBuf::from("/srv/work"));
    }

    #[test]
    fn json_roundtrip() {
        let config = AppConfig {
            workspace_root: Some(PathBuf::from("elsewhere")),
            dark_mode: false,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: AppConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }

    /// Unknown or missing fields must not break loading — `serde(default)`
    /// keeps old config files working.
    #[test]
    fn partial_json_fills_defaults() {
        let back: AppConfig = serde_json::from_str(r#"{"dark_mode": false}"#).expect("parse");
        assert!(!back.dark_mode);
        assert_eq!(back.workspace_root, None);
    }
}
