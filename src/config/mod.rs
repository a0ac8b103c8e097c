//! Configuration management for gpm

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ui_backend::{ThemePreset, VisibilityPolicy};

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "GPM_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub contexts: ContextsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the policy manager backend
    pub base_url: String,
    /// Per-request timeout; unset waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Show the logout action
    pub auth_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            timeout_secs: None,
            auth_enabled: false,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Cluster contexts offered before the backend is asked
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ContextsConfig {
    pub available: Vec<String>,
    /// Initially selected context; empty means in-cluster mode
    pub current: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub theme: ThemePreset,
    /// Input poll interval of the dashboard loop
    pub tick_ms: u64,
    pub visibility_policy: VisibilityPolicy,
    pub logout_reload_delay_ms: u64,
    pub sidebar_width: u16,
    /// Route shown at start, optionally with a `#constraint` fragment
    pub start_route: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemePreset::default(),
            tick_ms: 50,
            visibility_policy: VisibilityPolicy::default(),
            logout_reload_delay_ms: 2000,
            sidebar_width: 34,
            start_route: "/constraints".to_string(),
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn logout_reload_delay(&self) -> Duration {
        Duration::from_millis(self.logout_reload_delay_ms)
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "gpm") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Directory for log files written while the dashboard owns the terminal
    pub fn log_dir() -> Result<PathBuf> {
        let dir = directories::ProjectDirs::from("", "", "gpm")
            .map(|p| p.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from(".gpm/logs"));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/");
        assert!(config.api.timeout().is_none());
        assert_eq!(config.ui.logout_reload_delay(), Duration::from_secs(2));
        assert_eq!(config.ui.visibility_policy, VisibilityPolicy::Topmost);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://gpm.example.com/"
            auth_enabled = true

            [ui]
            visibility_policy = "most-visible"
            "#,
        )
        .unwrap();
        assert!(config.api.auth_enabled);
        assert_eq!(config.ui.visibility_policy, VisibilityPolicy::MostVisible);
        assert_eq!(config.ui.tick_ms, 50);
        assert!(config.contexts.available.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.contexts.available = vec!["kind-dev".to_string(), "kind-prod".to_string()];
        config.contexts.current = "kind-dev".to_string();
        config.api.timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
