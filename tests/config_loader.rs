mod common;

use std::fs;

use modstore::config::FingerprintConfig;
use modstore::{ConfigError, Store, StoreConfig};
use tempfile::TempDir;

/// Test that StoreConfig::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = StoreConfig::default();

    assert_eq!(config.name, "modstore");
    assert_eq!(config.fingerprint.seed, 0);
    assert!(config.validate().is_ok());
}

/// Test that a missing file yields the defaults instead of an error.
#[test]
fn test_load_missing_file_returns_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let config = StoreConfig::load(&path).unwrap();

    assert_eq!(config, StoreConfig::default());
}

/// Test loading a complete config file.
#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.toml");
    fs::write(
        &path,
        r#"
name = "checkout"

[fingerprint]
seed = 7
"#,
    )
    .unwrap();

    let config = StoreConfig::load(&path).unwrap();

    assert_eq!(
        config,
        StoreConfig {
            name: "checkout".to_string(),
            fingerprint: FingerprintConfig { seed: 7 },
        }
    );
}

/// Test that omitted sections fall back to defaults.
#[test]
fn test_partial_config_uses_defaults() {
    let config = StoreConfig::from_toml_str("[fingerprint]\nseed = 3\n").unwrap();
    assert_eq!(config.name, "modstore");
    assert_eq!(config.fingerprint.seed, 3);

    let config = StoreConfig::from_toml_str("name = \"cart\"\n").unwrap();
    assert_eq!(config.name, "cart");
    assert_eq!(config.fingerprint.seed, 0);

    let config = StoreConfig::from_toml_str("").unwrap();
    assert_eq!(config, StoreConfig::default());
}

/// Test that malformed TOML is reported as a parse error.
#[test]
fn test_invalid_toml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.toml");
    fs::write(&path, "name = \n[fingerprint").unwrap();

    match StoreConfig::load(&path).unwrap_err() {
        ConfigError::ParseError { .. } => {}
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

/// Test that a seed outside the u32 range is rejected while parsing.
#[test]
fn test_negative_seed_is_parse_error() {
    let result = StoreConfig::from_toml_str("[fingerprint]\nseed = -1\n");

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// Test validation fails for a blank store name.
#[test]
fn test_validation_fails_blank_name() {
    let result = StoreConfig::from_toml_str("name = \"   \"\n");

    match result.unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("name"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

/// Test that a directory in place of the file is a read error.
#[test]
fn test_unreadable_path_is_read_error() {
    let dir = TempDir::new().unwrap();

    match StoreConfig::load(dir.path()).unwrap_err() {
        ConfigError::ReadError { path, .. } => assert_eq!(path, dir.path()),
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

/// Test that the configured seed and name reach the store.
#[test]
fn test_store_uses_config() {
    common::init_tracing();
    let seeded = StoreConfig {
        name: "seeded".to_string(),
        fingerprint: FingerprintConfig { seed: 7 },
    };

    let plain = Store::new([common::module1()]);
    let store = Store::with_config([common::module1()], &seeded);

    assert_eq!(plain.name(), "modstore");
    assert_eq!(store.name(), "seeded");

    let plain_root = plain.get_state().unwrap();
    let seeded_root = store.get_state().unwrap();
    let plain_state = plain_root.module("hash1", "module1").unwrap();
    let seeded_state = seeded_root.module("hash1", "module1").unwrap();
    assert_eq!(plain_state.to_value(), seeded_state.to_value());
    assert_ne!(plain_state.fingerprint(), seeded_state.fingerprint());
    assert_eq!(**seeded_state, plain_state.retag(7));
}
