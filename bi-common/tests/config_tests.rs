//! Tests for configuration loading and data directory resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate BI_DATA_DIR or BI_CONFIG are marked with #[serial].

use bi_common::config::{
    config_file_path, load_config, load_toml_config, resolve_data_dir, validate_directory,
    ConfigOrigin, TomlConfig, CONFIG_ENV, DATA_DIR_ENV,
};
use bi_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_arg_takes_precedence_over_env_and_toml() {
    let cli_dir = TempDir::new().unwrap();
    let env_dir = TempDir::new().unwrap();
    env::set_var(DATA_DIR_ENV, env_dir.path());

    let config = TomlConfig {
        data_dir: Some(PathBuf::from("/nonexistent/toml")),
        ..TomlConfig::default()
    };

    let resolved = resolve_data_dir(Some(cli_dir.path()), DATA_DIR_ENV, &config).unwrap();
    assert_eq!(resolved, cli_dir.path());

    env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_env_fallback_when_no_cli_arg() {
    let env_dir = TempDir::new().unwrap();
    env::set_var(DATA_DIR_ENV, env_dir.path());

    let resolved = resolve_data_dir(None, DATA_DIR_ENV, &TomlConfig::default()).unwrap();
    assert_eq!(resolved, env_dir.path());

    env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_toml_fallback_when_no_cli_or_env() {
    env::remove_var(DATA_DIR_ENV);
    let toml_dir = TempDir::new().unwrap();
    let config = TomlConfig {
        data_dir: Some(toml_dir.path().to_path_buf()),
        ..TomlConfig::default()
    };

    let resolved = resolve_data_dir(None, DATA_DIR_ENV, &config).unwrap();
    assert_eq!(resolved, toml_dir.path());
}

#[test]
#[serial]
fn test_no_source_is_config_error() {
    env::remove_var(DATA_DIR_ENV);

    let result = resolve_data_dir(None, DATA_DIR_ENV, &TomlConfig::default());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_resolved_path_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let result = resolve_data_dir(Some(&missing), "BI_TEST_UNUSED_VAR", &TomlConfig::default());
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_file_is_not_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("ideas.csv");
    fs::write(&file, "Idea\n").unwrap();

    assert!(matches!(
        validate_directory(&file),
        Err(Error::NotADirectory(_))
    ));
}

#[test]
fn test_missing_toml_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = load_toml_config(Some(&temp_dir.path().join("absent.toml"))).unwrap();

    assert!(config.data_dir.is_none());
    assert_eq!(config.dedup.similarity_threshold, 0.85);
}

#[test]
fn test_full_toml_file_is_parsed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
data_dir = "/srv/ideas"
consolidated_file = "merged.csv"

[logging]
level = "debug"

[dedup]
similarity_threshold = 0.9
fail_fast = true

[links]
manifest_file = "PAGES.txt"
"#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/ideas")));
    assert_eq!(config.consolidated_file, "merged.csv");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.dedup.similarity_threshold, 0.9);
    assert!(config.dedup.fail_fast);
    assert_eq!(config.links.manifest_file, "PAGES.txt");
}

#[test]
fn test_malformed_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "data_dir = [unterminated").unwrap();

    assert!(matches!(load_toml_config(Some(&path)), Err(Error::Config(_))));
}

#[test]
fn test_out_of_range_threshold_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[dedup]\nsimilarity_threshold = 2.0\n").unwrap();

    assert!(matches!(load_toml_config(Some(&path)), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_config_file_path_priority() {
    let explicit = PathBuf::from("/tmp/explicit.toml");
    env::set_var(CONFIG_ENV, "/tmp/from-env.toml");

    assert_eq!(config_file_path(Some(&explicit)), Some(explicit.clone()));
    assert_eq!(
        config_file_path(None),
        Some(PathBuf::from("/tmp/from-env.toml"))
    );

    env::remove_var(CONFIG_ENV);
}

#[test]
#[serial]
fn test_load_config_reads_file_named_by_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bi.toml");
    fs::write(&path, "consolidated_file = \"merged.csv\"\n[dedup]\nsimilarity_threshold = 0.9\n")
        .unwrap();
    env::set_var(CONFIG_ENV, &path);

    let loaded = load_config(None).unwrap();

    env::remove_var(CONFIG_ENV);
    assert_eq!(loaded.origin, ConfigOrigin::File(path));
    assert_eq!(loaded.config.consolidated_file, "merged.csv");
    assert_eq!(loaded.config.dedup.similarity_threshold, 0.9);
}

#[test]
#[serial]
fn test_load_config_cli_path_beats_env() {
    let temp_dir = TempDir::new().unwrap();
    let cli_path = temp_dir.path().join("cli.toml");
    let env_path = temp_dir.path().join("env.toml");
    fs::write(&cli_path, "consolidated_file = \"from-cli.csv\"\n").unwrap();
    fs::write(&env_path, "consolidated_file = \"from-env.csv\"\n").unwrap();
    env::set_var(CONFIG_ENV, &env_path);

    let loaded = load_config(Some(&cli_path)).unwrap();

    env::remove_var(CONFIG_ENV);
    assert_eq!(loaded.origin, ConfigOrigin::File(cli_path));
    assert_eq!(loaded.config.consolidated_file, "from-cli.csv");
}

#[test]
#[serial]
fn test_load_config_missing_env_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");
    env::set_var(CONFIG_ENV, &path);

    let loaded = load_config(None).unwrap();

    env::remove_var(CONFIG_ENV);
    assert_eq!(loaded.origin, ConfigOrigin::Missing(path));
    assert_eq!(loaded.config.consolidated_file, "consolidated_ideas.csv");
}
