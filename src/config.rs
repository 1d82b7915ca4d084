//! Configuration management for hlsdeck
//!
//! Handles config file loading and environment overrides.
//! Config is stored at ~/.config/hlsdeck/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::stream::PlayerKind;

/// Env var overriding the backend origin
pub const ORIGIN_ENV: &str = "HLSDECK_ORIGIN";
/// Env var overriding the mpv binary
pub const MPV_ENV: &str = "HLSDECK_MPV";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin; unset or `file:` means the loopback backend
    pub origin: Option<String>,
    /// Media element to drive
    pub player: PlayerKind,
    /// mpv binary (name in PATH or full path)
    pub mpv_path: Option<String>,
    /// Allow picture-in-picture
    pub pip: bool,
    /// Checkpoint file location
    pub progress_file: Option<PathBuf>,
    /// Log file for TUI mode
    pub log_file: Option<PathBuf>,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: None,
            player: PlayerKind::Mpv,
            mpv_path: None,
            pip: true,
            progress_file: None,
            log_file: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/hlsdeck/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hlsdeck").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from a specific file; unreadable or invalid files give defaults
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Backend origin with fallback chain:
    /// 1. Explicit value (CLI flag)
    /// 2. Environment variable HLSDECK_ORIGIN
    /// 3. Config file
    pub fn origin(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| std::env::var(ORIGIN_ENV).ok())
            .or_else(|| self.origin.clone())
    }

    /// mpv binary: HLSDECK_MPV, then config, then `mpv`
    pub fn mpv_command(&self) -> String {
        std::env::var(MPV_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.mpv_path.clone())
            .unwrap_or_else(|| "mpv".to_string())
    }

    /// Data directory for logs and checkpoints (~/.local/share/hlsdeck)
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("hlsdeck"))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| Self::data_dir().map(|d| d.join("hlsdeck.log")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.origin.is_none());
        assert_eq!(config.player, PlayerKind::Mpv);
        assert!(config.pip);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            origin = "http://nas.local:8000"
            player = "headless"
            "#,
        )
        .unwrap();
        assert_eq!(config.origin.as_deref(), Some("http://nas.local:8000"));
        assert_eq!(config.player, PlayerKind::Headless);
        assert!(config.pip);
    }

    #[test]
    fn test_explicit_origin_wins() {
        let config = Config {
            origin: Some("http://from-file".into()),
            ..Config::default()
        };
        assert_eq!(
            config.origin(Some("http://flag")).as_deref(),
            Some("http://flag")
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("hlsdeck-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = Config::load_from(&path);
        assert!(config.origin.is_none());
    }
}
