//! Configuration resolution and graceful degradation
//!
//! Uses serial_test: tests that manipulate FUZZYDX_ROOT_FOLDER are marked
//! #[serial] so they never run in parallel.

use fuzzydx_common::config::{
    load_or_default, load_toml_config, CompiledDefaults, RootFolderInitializer,
    RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.ends_with("fuzzydx") || defaults.root_folder.ends_with("fuzzydx_data"));
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.log_file.is_none());
    assert_eq!(defaults.bind_address, "127.0.0.1:5780");
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolver = RootFolderResolver::with_config("test-module", TomlConfig::default());
    let root_folder = resolver.resolve();

    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(root_folder, defaults.root_folder);
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    let test_path = "/tmp/fuzzydx-test-env-folder";
    env::set_var(ROOT_FOLDER_ENV, test_path);

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/fuzzydx-test-toml-folder")),
        ..Default::default()
    };
    let resolver = RootFolderResolver::with_config("test-module", toml);
    assert_eq!(resolver.resolve(), PathBuf::from(test_path));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/fuzzydx-test-toml-folder")),
        ..Default::default()
    };
    let resolver = RootFolderResolver::with_config("test-module", toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/fuzzydx-test-toml-folder"));
}

#[test]
#[serial]
fn test_resolver_ignores_blank_env_var() {
    env::set_var(ROOT_FOLDER_ENV, "   ");

    let resolver = RootFolderResolver::with_config("test-module", TomlConfig::default());
    assert_eq!(
        resolver.resolve(),
        CompiledDefaults::for_current_platform().root_folder
    );

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_load_full_toml_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/fuzzydx"
bind_address = "0.0.0.0:8080"
classifier_model = "/srv/models/classifier.json"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/fuzzydx")));
    assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:8080"));
    assert_eq!(
        config.classifier_model,
        Some(PathBuf::from("/srv/models/classifier.json"))
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_toml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = [not valid").unwrap();

    assert!(load_toml_config(&path).is_err());

    let config = load_or_default(Some(&path));
    assert!(config.root_folder.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_toml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_or_default(Some(&dir.path().join("absent.toml")));
    assert!(config.bind_address.is_none());

    let config = load_or_default(None);
    assert!(config.classifier_model.is_none());
}

#[test]
fn test_initializer_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("root");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("fuzzydx.db"));

    // Second call is a no-op
    initializer.ensure_directory_exists().unwrap();
}
