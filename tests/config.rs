//! Tests for config loading.

use sharedlog::{Config, Error, ParseError, RotationConfig, SamplingConfig};
use std::fs;
use tempfile::TempDir;

const FULL_YAML: &str = r"
level: debug
development: false
encoding: json
outputPath: /var/log/app.log
sampling:
  initial: 100
  thereafter: 10
rotation:
  maxSize: 50
  maxBackups: 3
  maxAge: 7
  compress: true
";

#[test]
fn load_full_yaml() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("log.yaml");
    fs::write(&path, FULL_YAML).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.level, "debug");
    assert!(!config.development);
    assert_eq!(config.encoding, "json");
    assert!(config.is_json());
    assert_eq!(config.output_path, "/var/log/app.log");
    assert_eq!(
        config.sampling,
        Some(SamplingConfig {
            initial: 100,
            thereafter: 10
        })
    );
    assert_eq!(
        config.rotation,
        RotationConfig {
            max_size: 50,
            max_backups: 3,
            max_age: 7,
            compress: true,
        }
    );
}

#[test]
fn missing_fields_take_defaults() {
    let config = Config::from_yaml_str("development: true\n").unwrap();
    assert!(config.development);
    assert_eq!(config.level, "info");
    assert_eq!(config.encoding, "console");
    assert!(config.sampling.is_none());
    assert_eq!(config.rotation, RotationConfig::default());
}

#[test]
fn empty_document_is_default() {
    assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    assert_eq!(Config::from_yaml_str("  \n").unwrap(), Config::default());
}

#[test]
fn null_sampling_is_absent() {
    let config = Config::from_yaml_str("sampling: ~\n").unwrap();
    assert!(config.sampling.is_none());
}

#[test]
fn load_toml_by_extension() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("log.toml");
    fs::write(
        &path,
        r#"
level = "warn"
development = true
outputPath = "out.log"

[rotation]
maxSize = 5
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.level, "warn");
    assert!(config.development);
    assert_eq!(config.output_path, "out.log");
    assert_eq!(config.rotation.max_size, 5);
}

#[test]
fn missing_file_is_io_error() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("absent.yaml");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.is_load_failure());
    assert!(err.to_string().contains("error reading log config"));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("bad.yaml");
    fs::write(&path, "level: [unclosed\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse {
            source: ParseError::Yaml(_),
            ..
        }
    ));
    assert!(err.to_string().contains("error parsing log config"));
}

#[test]
fn wrong_field_type_is_parse_error() {
    let err = Config::from_yaml_str("development: sometimes\n").unwrap_err();
    assert!(matches!(err, ParseError::Yaml(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("bad.toml");
    fs::write(&path, "level = \n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse {
            source: ParseError::Toml(_),
            ..
        }
    ));
}

#[test]
fn parse_level_falls_back_to_info() {
    let config = Config::from_yaml_str("level: invalid-label\n").unwrap();
    assert_eq!(config.parse_level(), sharedlog::Level::Info);
}

#[test]
fn display_summarizes_config() {
    let config = Config::from_yaml_str("level: warn\noutputPath: x.log\n").unwrap();
    assert_eq!(
        config.to_string(),
        "Level: warn, Development: false, OutputPath: x.log"
    );
}

#[test]
fn output_path_expands_tilde() {
    let config = Config::from_yaml_str("outputPath: ~/logs/app.log\n").unwrap();
    let resolved = config.resolved_output_path();
    assert!(!resolved.to_string_lossy().starts_with('~'));
    assert!(resolved.ends_with("logs/app.log"));
}

#[test]
fn negative_rotation_values_read_as_zero() {
    let config = Config::from_yaml_str(
        "level: warn\nrotation:\n  maxSize: -1\n  maxBackups: -3\n  maxAge: -7\n  compress: true\n",
    )
    .unwrap();
    assert_eq!(config.level, "warn");
    assert_eq!(
        config.rotation,
        RotationConfig {
            max_size: 0,
            max_backups: 0,
            max_age: 0,
            compress: true,
        }
    );
}

#[test]
fn negative_sampling_values_read_as_zero() {
    let config = Config::from_yaml_str("sampling:\n  initial: -5\n  thereafter: 10\n").unwrap();
    assert_eq!(
        config.sampling,
        Some(SamplingConfig {
            initial: 0,
            thereafter: 10
        })
    );
}

#[test]
fn negative_rotation_values_in_toml_read_as_zero() {
    let config = Config::from_toml_str("[rotation]\nmaxSize = -10\nmaxBackups = 4\n").unwrap();
    assert_eq!(config.rotation.max_size, 0);
    assert_eq!(config.rotation.max_backups, 4);
}
