//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the dashboard API base URL
pub const ENV_API_URL: &str = "IPO_DASH_API_URL";
/// Environment variable for the per-request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "IPO_DASH_TIMEOUT_SECS";
/// Environment variable for the log level
pub const ENV_LOG_LEVEL: &str = "IPO_DASH_LOG_LEVEL";
/// Environment variable for the log format (pretty or json)
pub const ENV_LOG_FORMAT: &str = "IPO_DASH_LOG_FORMAT";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at the given base URL, other fields defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("ipo-dash").join("config.toml")),
            Some(PathBuf::from("./ipo-dash.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load the first of `paths` that exists, with environment overrides.
    ///
    /// A file that exists but cannot be read or parsed is an error rather
    /// than a reason to keep searching.
    pub fn load_first(paths: &[PathBuf]) -> Result<Option<Self>, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        match Self::load_first(&Self::default_paths()) {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("Using default config with environment overrides");
                Self::from_env()
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::from_env()
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup (the process environment in practice)
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = secs;
            }
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# IPO Dash Configuration
#
# Environment variables override these settings:
# - IPO_DASH_API_URL
# - IPO_DASH_TIMEOUT_SECS
# - IPO_DASH_LOG_LEVEL
# - IPO_DASH_LOG_FORMAT

[api]
# Base URL of the IPO analytics API
base_url = "http://localhost:8000"

# Per-request timeout in seconds
request_timeout_secs = 15

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url(), "http://localhost:8000");
        assert_eq!(config.api.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let api = ApiConfig::new("https://ipo.example.com/api/");
        assert_eq!(api.base_url(), "https://ipo.example.com/api");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.request_timeout_secs, 15);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://10.0.0.5:9000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.api.request_timeout_secs, 15);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_first_skips_missing_paths() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("ipo-dash.toml");
        std::fs::write(&present, "[logging]\nlevel = \"debug\"\n").unwrap();

        let paths = vec![dir.path().join("absent.toml"), present];
        let config = Config::load_first(&paths).unwrap().unwrap();
        assert_eq!(config.logging.level, "debug");

        assert!(Config::load_first(&paths[..1]).unwrap().is_none());
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        let valid = dir.path().join("ipo-dash.toml");
        std::fs::write(&broken, "[api\nbase_url = ").unwrap();
        std::fs::write(&valid, "[logging]\nlevel = \"debug\"\n").unwrap();

        let err = Config::load_first(&[broken, valid]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "https://api.ipo.test"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_LOG_FORMAT, "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url(), "https://api.ipo.test");
        assert_eq!(config.api.request_timeout_secs, 3);
        assert!(config.logging.is_json());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unparseable_timeout_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.api.request_timeout_secs, 15);
    }
}
