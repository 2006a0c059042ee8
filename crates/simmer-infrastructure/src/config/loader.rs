//! Configuration loader
//!
//! Loads configuration from defaults, a TOML file, and environment
//! variables, merged in that order (later sources override earlier).

use crate::config::AppConfig;
use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_FILE_NAME};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use simmer_domain::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader service
#[derive(Clone, Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Merge order (later overrides earlier):
    /// 1. `AppConfig::default()`
    /// 2. TOML file (explicit path, or `simmer.toml` in the working
    ///    directory)
    /// 3. Environment variables with the prefix, nested keys separated
    ///    by double underscore (e.g. `SIMMER_CACHE__REDIS_URL`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let path = self
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if path.exists() {
            debug!(path = %path.display(), "loading configuration file");
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config_with_source("Failed to extract configuration", e))?;

        Self::validate(&config)?;

        Ok(config)
    }

    fn validate(config: &AppConfig) -> Result<()> {
        if config.cache.scan_page_size == 0 {
            return Err(Error::config("cache.scan_page_size must be positive"));
        }
        if config.cache.max_items == 0 {
            return Err(Error::config("cache.max_items must be positive"));
        }
        if config.cache.cooldown_secs == 0 {
            return Err(Error::config("cache.cooldown_secs must be positive"));
        }
        if config.sync.channel.is_empty() {
            return Err(Error::config("sync.channel must not be empty"));
        }
        if config.sync.retry_cap == 0 {
            return Err(Error::config("sync.retry_cap must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
