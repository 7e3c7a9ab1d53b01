//! Client configuration.
//!
//! Values are layered: built-in defaults, then an optional
//! `config.toml` in the user's configuration directory, then environment
//! variables (`BUDDYBEAM_API_URL`, `BUDDYBEAM_OFFLINE`).

use std::path::PathBuf;

use crate::shared::config::AppConfig;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_parts(AppConfig::default(), false)
    }
}

impl Config {
    pub fn from_parts(app: AppConfig, offline: bool) -> Self {
        Self { app, offline }
    }

    /// Load configuration from the config file and the environment.
    pub fn load() -> Self {
        let file = match config_file_path() {
            Some(path) => match AppConfig::load_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring config file {}: {}", path.display(), e);
                    AppConfig::default()
                }
            },
            None => AppConfig::default(),
        };

        let mut app = AppConfig::default().merge(file);
        if let Ok(url) = std::env::var("BUDDYBEAM_API_URL") {
            app.server_url = Some(url);
        }
        let offline = std::env::var("BUDDYBEAM_OFFLINE").unwrap_or_default() == "1";

        Self { app, offline }
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Whether to run against the in-memory platform instead of a backend.
    pub fn offline(&self) -> bool {
        self.offline
    }
}

/// `{config_dir}/buddybeam/config.toml`
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("buddybeam").join("config.toml"))
}
