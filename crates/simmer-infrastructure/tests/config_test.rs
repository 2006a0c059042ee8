//! Configuration loading tests

use simmer_infrastructure::config::{AppConfig, CacheBackendKind, ConfigLoader};
use std::io::Write;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_when_no_file_exists() {
    let config = ConfigLoader::new()
        .with_config_path("/nonexistent/simmer.toml")
        .with_env_prefix("SIMMER_TEST_DEFAULTS")
        .load()
        .expect("defaults load");

    assert!(config.cache.enabled);
    assert_eq!(config.cache.backend, CacheBackendKind::Memory);
    assert_eq!(config.cache.redis_url, None);
    assert_eq!(config.cache.max_items, 100);
    assert_eq!(config.cache.cooldown_secs, 30);
    assert!(config.sync.enabled);
    assert_eq!(config.sync.channel, "cache:invalidation");
    assert_eq!(config.sync.retry_cap, 3);
}

#[test]
fn toml_file_overrides_defaults() {
    let file = write_config(
        r#"
[cache]
backend = "redis"
redis_url = "redis://localhost:6379"
max_items = 500

[sync]
enabled = false

[logging]
level = "debug"
json_format = true
"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("SIMMER_TEST_TOML")
        .load()
        .expect("toml config loads");

    assert_eq!(config.cache.backend, CacheBackendKind::Redis);
    assert_eq!(
        config.cache.redis_url.as_deref(),
        Some("redis://localhost:6379")
    );
    assert_eq!(config.cache.max_items, 500);
    assert!(!config.sync.enabled);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json_format);

    // Untouched sections keep their defaults.
    assert_eq!(config.sync.channel, "cache:invalidation");
    assert_eq!(config.cache.cooldown_secs, 30);
}

#[test]
fn environment_overrides_file() {
    let file = write_config("[cache]\nmax_items = 500\n");

    // A unique prefix keeps this test independent of the real
    // environment and of other tests running in parallel.
    std::env::set_var("SIMMER_TEST_ENV_CACHE__MAX_ITEMS", "42");
    std::env::set_var("SIMMER_TEST_ENV_SYNC__CHANNEL", "cache:staging");

    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("SIMMER_TEST_ENV")
        .load()
        .expect("env config loads");

    assert_eq!(config.cache.max_items, 42);
    assert_eq!(config.sync.channel, "cache:staging");

    std::env::remove_var("SIMMER_TEST_ENV_CACHE__MAX_ITEMS");
    std::env::remove_var("SIMMER_TEST_ENV_SYNC__CHANNEL");
}

#[test]
fn zero_scan_page_size_is_rejected() {
    let file = write_config("[cache]\nscan_page_size = 0\n");

    let result = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("SIMMER_TEST_VALIDATE_SCAN")
        .load();

    assert!(result.is_err());
}

#[test]
fn empty_sync_channel_is_rejected() {
    let file = write_config("[sync]\nchannel = \"\"\n");

    let result = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("SIMMER_TEST_VALIDATE_CHANNEL")
        .load();

    assert!(result.is_err());
}

#[test]
fn config_round_trips_through_toml() {
    let config = AppConfig::default();
    let rendered = toml::to_string(&config).expect("serialize defaults");
    let parsed: AppConfig = toml::from_str(&rendered).expect("parse rendered defaults");
    assert_eq!(parsed.cache.max_items, config.cache.max_items);
    assert_eq!(parsed.sync.channel, config.sync.channel);
}
