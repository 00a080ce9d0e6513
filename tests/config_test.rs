//! Integration tests for Settings loading from an explicit config file.
//!
//! These tests only pass explicit files, so the working directory's
//! `.spedtree.toml` is never consulted.

use std::fs;

use tempfile::TempDir;

use spedtree::config::{expand_env_vars, Settings};
use spedtree::domain::LineFormat;
use spedtree::infrastructure::{Encoding, InfraError};

#[test]
fn given_config_with_relative_relations_when_load_then_resolves_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("spedtree.toml");
    fs::write(&config_path, "relations = \"layouts/efd.json\"\n").unwrap();

    let settings = Settings::load(Some(&config_path)).expect("load settings");

    assert_eq!(
        settings.relations,
        Some(dir.path().join("layouts/efd.json"))
    );
}

#[test]
fn given_config_with_format_section_when_load_then_overrides_only_given_keys() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("spedtree.toml");
    fs::write(
        &config_path,
        r#"
encoding = "utf8"

[format]
delimiter = ";"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&config_path)).expect("load settings");

    assert_eq!(settings.encoding, Encoding::Utf8);
    assert_eq!(
        settings.line_format(),
        LineFormat {
            delimiter: ';',
            type_tag_width: 4
        }
    );
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();

    assert!(matches!(err, InfraError::Config { .. }), "{err}");
}

#[test]
fn given_invalid_values_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("spedtree.toml");
    fs::write(&config_path, "[format]\ntype_tag_width = 0\n").unwrap();

    let err = Settings::load(Some(&config_path)).unwrap_err();

    assert!(err.to_string().contains("type_tag_width"));
}

#[test]
fn given_settings_when_serialized_then_toml_reloads_to_same_values() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("spedtree.toml");
    fs::write(&config_path, "relations = \"/srv/layouts/efd.json\"\n").unwrap();
    let settings = Settings::load(Some(&config_path)).unwrap();

    let reloaded_path = dir.path().join("reloaded.toml");
    fs::write(&reloaded_path, settings.to_toml().unwrap()).unwrap();

    assert_eq!(Settings::load(Some(&reloaded_path)).unwrap(), settings);
}

#[test]
fn given_home_prefix_when_expanding_then_tilde_is_replaced() {
    let expanded = expand_env_vars("~/layouts/efd.json");

    assert!(!expanded.starts_with('~'));
    assert!(expanded.ends_with("/layouts/efd.json"));
}
