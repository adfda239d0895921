//! Config file resolution and loading
//!
//! Tests that manipulate MTX_CONFIG are marked with #[serial] so they run
//! sequentially, not in parallel.

use mtx_common::config::{resolve_config_source, ConfigSource, TransferConfig, CONFIG_ENV_VAR};
use mtx_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_argument_wins_over_environment() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/mtx-env-config.toml");

    let cli = PathBuf::from("/tmp/mtx-cli-config.toml");
    let source = resolve_config_source(Some(cli.as_path()));
    assert_eq!(source, ConfigSource::CommandLine(cli));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_environment_variable_used_without_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/mtx-env-config.toml");

    let source = resolve_config_source(None);
    assert_eq!(
        source,
        ConfigSource::Environment(PathBuf::from("/tmp/mtx-env-config.toml"))
    );

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let result = TransferConfig::load(Some(missing.as_path()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_load_from_cli_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
source_extensions = ["flac", "wav"]
target_extension = "ogg"
workers = 2

[encoder]
program = "/usr/local/bin/ffmpeg"
codec = "libvorbis"
quality = 5

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let (config, source) = TransferConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(source, ConfigSource::CommandLine(path));
    assert_eq!(config.source_extensions, vec!["flac", "wav"]);
    assert_eq!(config.target_extension, "ogg");
    assert_eq!(config.worker_count(), 2);
    assert_eq!(config.encoder.program, PathBuf::from("/usr/local/bin/ffmpeg"));
    assert_eq!(config.encoder.codec, "libvorbis");
    assert_eq!(config.encoder.quality, 5);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_none());
}

#[test]
#[serial]
fn test_invalid_file_reports_path() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "target_extension = [").unwrap();

    let err = TransferConfig::load(Some(path.as_path())).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}
