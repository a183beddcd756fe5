#![allow(unsafe_code)]

//! Configuration tests that mutate the process environment
//! These tests are separated to avoid conflicts with the forbid(unsafe_code) directive

use scaleway_provider::config::resolver::{
    LEGACY_ACCESS_KEY_ENV, LEGACY_ORGANIZATION_ENV, LEGACY_REGION_ENV, LEGACY_TOKEN_ENV,
};
use scaleway_provider::config::store::{
    ACCESS_KEY_ENV, CONFIG_PATH_ENV, DEFAULT_ORGANIZATION_ID_ENV, DEFAULT_REGION_ENV,
    DEFAULT_ZONE_ENV, PROFILE_ENV, SECRET_KEY_ENV,
};
use scaleway_provider::config::types::SETTINGS_PATH;
use scaleway_provider::config::{ConfigResolver, ConfigStore, ExplicitConfig, get_settings};
use scaleway_provider::error::ConfigError;
use scaleway_provider::locality::{Region, Zone};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn remove_env_var(key: &str) {
    unsafe {
        std::env::remove_var(key);
    }
}

fn set_env_var(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

fn clear_env() {
    let managed = [
        CONFIG_PATH_ENV,
        PROFILE_ENV,
        ACCESS_KEY_ENV,
        SECRET_KEY_ENV,
        DEFAULT_ORGANIZATION_ID_ENV,
        DEFAULT_REGION_ENV,
        DEFAULT_ZONE_ENV,
        LEGACY_ACCESS_KEY_ENV,
        LEGACY_TOKEN_ENV,
        LEGACY_ORGANIZATION_ENV,
        LEGACY_REGION_ENV,
        SETTINGS_PATH,
    ];
    for key in managed {
        remove_env_var(key);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

fn point_store_at(file: &NamedTempFile) {
    set_env_var(CONFIG_PATH_ENV, file.path().to_str().unwrap());
}

#[test]
#[serial]
fn test_store_load_from_config_path() {
    clear_env();
    let file = config_file("secret_key: S\ndefault_organization_id: O\ndefault_region: fr-par\n");
    point_store_at(&file);

    let store = ConfigStore::load().unwrap();
    assert_eq!(store.secret_key(), Some("S"));
    assert_eq!(store.default_organization_id(), Some("O"));
    assert_eq!(store.default_region(), Some("fr-par"));
    assert_eq!(store.path(), Some(file.path()));

    clear_env();
}

#[test]
#[serial]
fn test_store_environment_overlay() {
    clear_env();
    let file = config_file("secret_key: from-file\ndefault_zone: fr-par-1\n");
    point_store_at(&file);
    set_env_var(SECRET_KEY_ENV, "from-env");
    set_env_var(DEFAULT_ZONE_ENV, "nl-ams-1");

    let store = ConfigStore::load().unwrap();
    assert_eq!(store.secret_key(), Some("from-env"));
    assert_eq!(store.default_zone(), Some("nl-ams-1"));

    clear_env();
}

#[test]
#[serial]
fn test_store_profile_from_environment() {
    clear_env();
    let file = config_file(
        "secret_key: top\nprofiles:\n  staging:\n    secret_key: staging\n    default_region: nl-ams\n",
    );
    point_store_at(&file);
    set_env_var(PROFILE_ENV, "staging");

    let store = ConfigStore::load().unwrap();
    assert_eq!(store.profile(), Some("staging"));
    assert_eq!(store.secret_key(), Some("staging"));
    assert_eq!(store.default_region(), Some("nl-ams"));

    clear_env();
}

#[test]
#[serial]
fn test_store_malformed_file() {
    clear_env();
    let file = config_file("profiles: [unterminated\n");
    point_store_at(&file);

    let err = ConfigStore::load().unwrap_err();
    assert!(matches!(err, ConfigError::StoreLoad { .. }));
    assert!(err.to_string().starts_with("cannot load configuration from"));

    clear_env();
}

#[test]
#[serial]
fn test_resolver_reads_process_environment() {
    clear_env();
    set_env_var(LEGACY_TOKEN_ENV, "env-token");
    set_env_var(LEGACY_ORGANIZATION_ENV, "env-org");
    set_env_var(LEGACY_REGION_ENV, "nl-ams");

    let store = ConfigStore::default();
    let config = ConfigResolver::new(&store)
        .with_legacy_path(None)
        .resolve(&ExplicitConfig::default());

    assert_eq!(config.secret_key.as_deref(), Some("env-token"));
    assert_eq!(config.default_organization_id.as_deref(), Some("env-org"));
    assert_eq!(config.default_region, Some(Region::NL_AMS));
    assert_eq!(config.default_zone, None);

    clear_env();
}

#[test]
#[serial]
fn test_resolver_empty_environment_falls_through() {
    clear_env();
    set_env_var(LEGACY_ACCESS_KEY_ENV, "");
    set_env_var(LEGACY_REGION_ENV, "");

    let store = ConfigStore::default();
    let config = ConfigResolver::new(&store)
        .with_legacy_path(None)
        .resolve(&ExplicitConfig::default());

    assert_eq!(config.access_key, None);
    assert_eq!(config.default_region, Some(Region::FR_PAR));
    assert_eq!(config.default_zone, Some(Zone::FR_PAR_1));

    clear_env();
}

#[test]
#[serial]
fn test_resolver_legacy_file() {
    clear_env();
    let legacy = config_file(r#"{"organization": "legacy-org", "token": "legacy-token", "version": "1.0"}"#);

    let store = ConfigStore::default();
    let config = ConfigResolver::new(&store)
        .with_legacy_path(Some(legacy.path().to_path_buf()))
        .resolve(&ExplicitConfig::default());

    assert_eq!(config.secret_key.as_deref(), Some("legacy-token"));
    assert_eq!(config.default_organization_id.as_deref(), Some("legacy-org"));
}

#[test]
#[serial]
fn test_get_settings_missing_env_var() {
    clear_env();

    let result = get_settings();
    assert!(matches!(result, Err(ConfigError::Settings(_))));
}

#[test]
#[serial]
fn test_get_settings_from_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[network]
request_timeout_secs = 5

[retry]
max_retries = 1
min_wait_secs = 2
max_wait_secs = 4
"#
    )
    .unwrap();
    set_env_var(SETTINGS_PATH, file.path().to_str().unwrap());

    let settings = get_settings().unwrap();
    assert_eq!(settings.network.request_timeout_secs, 5);
    assert_eq!(settings.retry.max_retries, 1);
    assert_eq!(settings.retry.max_wait_secs, 4);
    assert_eq!(settings.network.connect_timeout_secs, 10);

    clear_env();
}

#[test]
#[serial]
fn test_get_settings_missing_file() {
    clear_env();
    set_env_var(SETTINGS_PATH, "/path/that/does/not/exist/settings.toml");

    assert!(get_settings().is_err());

    clear_env();
}
