//! Configuration file handling for live-detect.
//!
//! Loads configuration from the platform config dir (for example
//! `~/.config/live-detect/config.toml`) or a custom path. Every field is
//! optional; CLI arguments and environment variables take precedence over
//! file values.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure for live-detect.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detect: DetectConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerConfig {
    /// Detection server base URL.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    /// Camera device index.
    pub device: Option<u32>,
    /// Mirror the feed horizontally.
    pub mirror: Option<bool>,
    /// Requested capture width in pixels.
    pub width: Option<u32>,
    /// Requested capture height in pixels.
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DetectConfig {
    /// Milliseconds between prediction cycles.
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UiConfig {
    /// Show the bottom status bar.
    pub status_bar: Option<bool>,
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Without one,
    /// the default path is used when present, and built-in defaults
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(explicit) => Self::from_file(explicit),
            None => {
                let default = default_path();
                if default.exists() {
                    Self::from_file(&default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "live-detect", "live-detect")
        .map(|d| d.config_dir().to_path_buf().join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/live-detect/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            url = "http://detect.local:8080"

            [camera]
            device = 2
            mirror = true
            width = 640
            height = 480

            [detect]
            interval_ms = 500

            [ui]
            status_bar = false
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.url.as_deref(), Some("http://detect.local:8080"));
        assert_eq!(config.camera.device, Some(2));
        assert_eq!(config.camera.mirror, Some(true));
        assert_eq!(config.camera.width, Some(640));
        assert_eq!(config.camera.height, Some(480));
        assert_eq!(config.detect.interval_ms, Some(500));
        assert_eq!(config.ui.status_bar, Some(false));
    }

    #[test]
    fn test_parse_empty_config_uses_none_everywhere() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.server.url.is_none());
        assert!(config.camera.device.is_none());
        assert!(config.detect.interval_ms.is_none());
        assert!(config.ui.status_bar.is_none());
    }

    #[test]
    fn test_parse_partial_sections() {
        let config: Config = toml::from_str("[detect]\ninterval_ms = 2000\n").unwrap();
        assert_eq!(config.detect.interval_ms, Some(2000));
        assert!(config.server.url.is_none());
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_explicit_path_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nurl = \"http://example.test\"").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.url.as_deref(), Some("http://example.test"));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
