use std::path::PathBuf;
use std::time::Duration;

use tabflow::config::{Config, ConfigError, Defaults, EndpointsConfig, NetworkConfig};
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.defaults.tab, "sports");
    assert_eq!(config.defaults.city, None);
    assert_eq!(config.network.timeout_seconds, 10);
    assert_eq!(config.network.search_debounce_ms, 300);
    assert_eq!(config.network.flight_poll_interval(), None);
    assert!(config.endpoints.flights.starts_with("https://"));
    assert_eq!(config.persistence.favorites_path, None);
    assert!(config
        .persistence
        .favorites_path()
        .ends_with("tabflow/favorites.json"));
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("tabflow/config.toml"));
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

/// Test validation fails for an unknown startup tab.
#[test]
fn test_validation_fails_unknown_tab() {
    let config = Config {
        defaults: Defaults {
            tab: "cinema".to_string(),
            city: None,
        },
        ..Config::default()
    };

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("cinema"));
        }
        _ => panic!("Expected ValidationError"),
    }
}

#[test]
fn test_validation_fails_zero_timeout() {
    let config = Config {
        network: NetworkConfig {
            timeout_seconds: 0,
            ..NetworkConfig::default()
        },
        ..Config::default()
    };

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("timeout_seconds"));
        }
        _ => panic!("Expected ValidationError"),
    }
}

/// Test validation rejects endpoints that are not http(s).
#[test]
fn test_validation_fails_non_http_endpoint() {
    let config = Config {
        endpoints: EndpointsConfig {
            news: "ftp://news.example.com".to_string(),
            ..EndpointsConfig::default()
        },
        ..Config::default()
    };

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("news"));
            assert!(message.contains("ftp://"));
        }
        _ => panic!("Expected ValidationError"),
    }
}

/// Test that a partial TOML file fills the rest from defaults.
#[test]
fn test_load_partial_file_uses_defaults() {
    let (_dir, path) = write_config(
        r#"
[defaults]
tab = "weather"
city = "Lisbon"

[network]
search_debounce_ms = 150
flight_poll_seconds = 30

[persistence]
favorites_path = "/tmp/tabflow-test/favorites.json"
"#,
    );

    let config = Config::load_from(&path).expect("Should load config");

    assert_eq!(config.defaults.tab, "weather");
    assert_eq!(config.defaults.city.as_deref(), Some("Lisbon"));
    assert_eq!(config.network.timeout_seconds, 10);
    assert_eq!(config.network.search_debounce(), Duration::from_millis(150));
    assert_eq!(
        config.network.flight_poll_interval(),
        Some(Duration::from_secs(30))
    );
    assert_eq!(config.endpoints, EndpointsConfig::default());
    assert_eq!(
        config.persistence.favorites_path(),
        PathBuf::from("/tmp/tabflow-test/favorites.json")
    );
}

/// Test that a missing file yields the defaults.
#[test]
fn test_load_missing_file_returns_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::load_from(&temp_dir.path().join("absent.toml")).expect("Should load");
    assert_eq!(config, Config::default());
}

/// Test that invalid TOML produces a parse error naming the file.
#[test]
fn test_load_invalid_toml() {
    let (_dir, path) = write_config("this is not valid toml [[[");

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ParseError { path: err_path, .. } => assert_eq!(err_path, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

/// Test that a parsed but invalid file fails validation.
#[test]
fn test_load_runs_validation() {
    let (_dir, path) = write_config("[network]\ntimeout_seconds = 0\n");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// Test round-trip serialization/deserialization.
#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let serialized = toml::to_string(&original).expect("Should serialize");
    let deserialized: Config = toml::from_str(&serialized).expect("Should deserialize");
    assert_eq!(original, deserialized);
}
