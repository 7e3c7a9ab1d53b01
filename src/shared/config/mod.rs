//! Application configuration module
//!
//! Provides configuration types for the application. Values are layered:
//! built-in defaults, then an optional TOML file, then the environment
//! (applied by the app-level wrapper).

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from a TOML file, returning defaults if the file
    /// does not exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay another configuration: values present in `other` win.
    pub fn merge(mut self, other: AppConfig) -> Self {
        if other.server_url.is_some() {
            self.server_url = other.server_url;
        }
        self
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: String) -> Self {
        self.server_url = Some(url);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        Ok(AppConfig {
            server_url: self.server_url,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(String),
    #[error("invalid config file: {0}")]
    Parse(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_sets_server_url() {
        let config = AppConfig::builder()
            .server_url("http://localhost:9000".to_string())
            .build()
            .unwrap();
        assert_eq!(config.server_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load_file(Path::new("/nonexistent/buddybeam.toml")).unwrap();
        assert!(config.server_url.is_none());
    }

    #[test]
    fn test_load_file_parses_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = \"https://chat.example\"").unwrap();

        let config = AppConfig::load_file(file.path()).unwrap();
        assert_eq!(config.server_url.as_deref(), Some("https://chat.example"));
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = [not toml").unwrap();

        let err = AppConfig::load_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = AppConfig {
            server_url: Some("http://base".to_string()),
        };
        let overlay = AppConfig {
            server_url: Some("http://overlay".to_string()),
        };
        assert_eq!(
            base.clone().merge(overlay).server_url.as_deref(),
            Some("http://overlay")
        );
        assert_eq!(
            base.clone().merge(AppConfig::default()).server_url.as_deref(),
            Some("http://base")
        );
    }
}
