//! Integration tests for Settings config loading with layered precedence.
//!
//! Note: most tests pass explicit config files to `Settings::load_from`
//! so that a global config on the test machine cannot interfere.

use std::fs;

use tempfile::TempDir;

use svisuelte::application::ApplicationError;
use svisuelte::config::{local_config_path, Settings};

#[test]
fn given_local_config_when_loading_dir_then_values_applied() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "root_tag = \"section\"\ncheck = true\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.root_tag, "section");
    assert!(settings.check);
}

#[test]
fn given_global_and_local_config_when_loading_then_local_wins_per_key() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let local = dir.path().join("local.toml");
    fs::write(&global, "root_tag = \"main\"\nindent = \"  \"\n").unwrap();
    fs::write(&local, "indent = \"    \"\n").unwrap();

    let settings = Settings::load_from(Some(&global), Some(&local)).unwrap();

    assert_eq!(settings.root_tag, "main");
    assert_eq!(settings.indent, "    ");
    assert!(!settings.check);
}

#[test]
fn given_no_config_files_when_loading_then_defaults() {
    let settings = Settings::load_from(None, None).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.render_options().indent, "\t");
}

#[test]
fn given_malformed_toml_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let local = dir.path().join("broken.toml");
    fs::write(&local, "root_tag = [unclosed\n").unwrap();

    let err = Settings::load_from(None, Some(&local)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_empty_root_tag_when_loading_then_rejected() {
    let dir = TempDir::new().unwrap();
    let local = dir.path().join("empty.toml");
    fs::write(&local, "root_tag = \"\"\n").unwrap();

    let err = Settings::load_from(None, Some(&local)).unwrap_err();

    assert!(err.to_string().contains("root_tag"));
}

#[test]
fn given_effective_settings_when_serializing_then_round_trips_through_toml() {
    let settings = Settings {
        root_tag: "article".into(),
        indent: "  ".into(),
        check: true,
    };

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}
