//! Application configuration loading.
//!
//! Settings come from a TOML file (path in `HF_CONFIG`, default
//! `config.toml`). A missing file is not an error: every setting has a
//! default. `DATABASE_URL` in the environment wins over the file.

use crate::config::catalog::Catalog;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_VAR: &str = "HF_CONFIG";

const DEFAULT_DATABASE_URL: &str = "sqlite://data/hf_system.sqlite?mode=rwc";

/// Settings for the desk binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Buffered change notifications per subscriber before it lags
    pub change_feed_capacity: usize,
    /// Selector options
    pub catalog: Catalog,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            change_feed_capacity: 64,
            catalog: Catalog::default(),
        }
    }
}

impl AppConfig {
    /// Parses TOML text; absent keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config: {e}"),
        })
    }

    /// Replaces the database URL when `url` is set and not blank.
    #[must_use]
    pub fn with_database_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            debug!("Database URL overridden from environment");
            self.database_url = url;
        }
        self
    }
}

/// Loads configuration from `path`. The file must exist.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    AppConfig::from_toml(&contents)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        info!("No config file at {}, using defaults", path.display());
        Ok(AppConfig::default())
    }
}

/// Loads the configuration the binary runs with.
pub fn load_app_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_default(&path)?
        .with_database_override(std::env::var("DATABASE_URL").ok());
    info!("Configuration loaded");
    Ok(config)
}
