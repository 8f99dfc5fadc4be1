//! Configuration management for StreamAgg
//!
//! Config is stored at ~/.config/streamagg/config.toml. Environment
//! variables override the file; CLI flags override both.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::backend::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::app::Settings;
use crate::models::Genre;
use crate::player::{LocalPlayer, PlayerKind};
use crate::runtime::RuntimeOptions;

pub const ENV_BACKEND_URL: &str = "STREAMAGG_BACKEND_URL";
pub const ENV_PLAYER: &str = "STREAMAGG_PLAYER";
pub const ENV_LOG: &str = "STREAMAGG_LOG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the aggregator backend
    pub backend_url: String,
    pub request_timeout_secs: u64,
    /// Autosuggest quiet window
    pub debounce_ms: u64,
    /// Minimum trimmed query length before autosuggest fires
    pub min_query_len: usize,
    pub autosuggest_limit: usize,
    /// Genre tab loaded at startup
    pub default_genre: Genre,
    /// browser, mpv, vlc or none
    pub player: PlayerKind,
    pub mpv_ipc_socket: Option<PathBuf>,
    pub vlc_rc_port: Option<u16>,
    /// TUI log destination (defaults to the cache dir)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            debounce_ms: 300,
            min_query_len: 2,
            autosuggest_limit: 5,
            default_genre: Genre::Trending,
            player: PlayerKind::Browser,
            mpv_ipc_socket: None,
            vlc_rc_port: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/streamagg/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("streamagg").join("config.toml"))
    }

    /// Default TUI log file (<cache_dir>/streamagg/streamagg.log)
    pub fn default_log_file() -> Option<PathBuf> {
        dirs::cache_dir().map(|p| p.join("streamagg").join("streamagg.log"))
    }

    /// Load config from the default path with environment overrides
    pub fn load() -> Self {
        let mut config = Self::path()
            .and_then(|p| Self::from_file(&p).ok())
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load config from an explicit path with environment overrides.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        if let Some(player) = lookup(ENV_PLAYER) {
            match player.parse() {
                Ok(kind) => self.player = kind,
                Err(e) => tracing::warn!(%player, error = %e, "ignoring {}", ENV_PLAYER),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn settings(&self) -> Settings {
        Settings {
            min_query_len: self.min_query_len.max(1),
            autosuggest_limit: self.autosuggest_limit,
        }
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            start_genre: self.default_genre,
        }
    }

    /// Build the configured local player
    pub fn local_player(&self) -> LocalPlayer {
        let mut player = LocalPlayer::new(self.player);
        if let Some(socket) = &self.mpv_ipc_socket {
            player = player.with_mpv_ipc(socket);
        }
        if let Some(port) = self.vlc_rc_port {
            player = player.with_vlc_rc(port);
        }
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.default_genre, Genre::Trending);
        assert_eq!(config.player, PlayerKind::Browser);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            backend_url = "http://media.lan:8080"
            player = "mpv"
            default_genre = "sci-fi"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://media.lan:8080");
        assert_eq!(config.player, PlayerKind::Mpv);
        assert_eq!(config.default_genre, Genre::SciFi);
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.autosuggest_limit, 5);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BACKEND_URL, " http://10.0.0.2:5000 "),
            (ENV_PLAYER, "vlc"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.backend_url, "http://10.0.0.2:5000");
        assert_eq!(config.player, PlayerKind::Vlc);
    }

    #[test]
    fn test_bad_env_player_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|k| (k == ENV_PLAYER).then(|| "quicktime".to_string()));
        assert_eq!(config.player, PlayerKind::Browser);
    }

    #[test]
    fn test_load_from_file_keeps_defaults_for_missing_keys() {
        let dir = std::env::temp_dir().join(format!("streamagg-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "debounce_ms = 150\nvlc_rc_port = 4212\nplayer = \"vlc\"\n").unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.debounce_ms, 150);
        assert_eq!(loaded.vlc_rc_port, Some(4212));
        assert_eq!(loaded.player, PlayerKind::Vlc);
        assert_eq!(loaded.min_query_len, 2);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = std::env::temp_dir().join(format!("streamagg-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();
        assert!(Config::from_file(&path).is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_runtime_options_and_settings() {
        let config = Config {
            debounce_ms: 50,
            min_query_len: 0,
            default_genre: Genre::Horror,
            ..Config::default()
        };
        let opts = config.runtime_options();
        assert_eq!(opts.debounce, Duration::from_millis(50));
        assert_eq!(opts.start_genre, Genre::Horror);
        assert_eq!(config.settings().min_query_len, 1);
    }
}
