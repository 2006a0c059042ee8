//! Structured logging with tracing
//!
//! Centralized logging setup using the tracing ecosystem. Log filtering
//! honors the `SIMMER_LOG` environment variable, falling back to the
//! configured level.

use crate::config::LoggingConfig;
use crate::constants::LOG_ENV_VAR;
use simmer_domain::error::{Error, Result};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize logging with the provided configuration
///
/// Errors if a subscriber is already installed or the level is
/// unrecognized.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json_format {
        let stdout = fmt::layer().json().with_target(true);
        Registry::default()
            .with(filter)
            .with(stdout)
            .try_init()
            .map_err(|e| Error::config_with_source("Failed to install tracing subscriber", e))?;
    } else {
        let stdout = fmt::layer().with_target(true);
        Registry::default()
            .with(filter)
            .with(stdout)
            .try_init()
            .map_err(|e| Error::config_with_source("Failed to install tracing subscriber", e))?;
    }

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parse a log level string to a tracing [`Level`]
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!("Invalid log level: {level}"))),
    }
}
