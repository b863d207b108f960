//! Unit Tests for Configuration Loading
//!
//! Covers search-path lookup, explicit paths and validation failures.

use std::fs;
use std::path::PathBuf;

use ptyredact::{Config, ConfigLoader, Error};
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults_when_no_file_exists() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_search_paths(vec![dir.path().join("missing.toml")]);

    let (config, path) = loader.load(None).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.is_none());
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.pty.default_rows, 24);
    assert_eq!(config.pty.default_cols, 80);
    assert_eq!(config.pty.read_buffer_size, 4096);
}

#[test]
fn test_first_existing_search_path_wins() {
    let dir = TempDir::new().unwrap();
    let first = write_config(&dir, "first.toml", "[pty]\ndefault_rows = 50\n");
    let second = write_config(&dir, "second.toml", "[pty]\ndefault_rows = 60\n");
    let loader = ConfigLoader::with_search_paths(vec![
        dir.path().join("absent.toml"),
        first.clone(),
        second,
    ]);

    let (config, path) = loader.load(None).unwrap();
    assert_eq!(config.pty.default_rows, 50);
    assert_eq!(path, Some(first));
}

#[test]
fn test_explicit_path_overrides_search_paths() {
    let dir = TempDir::new().unwrap();
    let searched = write_config(&dir, "searched.toml", "[logging]\nlevel = \"info\"\n");
    let explicit = write_config(
        &dir,
        "explicit.toml",
        "[logging]\nlevel = \"debug\"\nfile = \"/tmp/ptyredact.log\"\n",
    );
    let loader = ConfigLoader::with_search_paths(vec![searched]);

    let (config, path) = loader.load(Some(&explicit)).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.logging.file,
        Some(PathBuf::from("/tmp/ptyredact.log"))
    );
    assert_eq!(path, Some(explicit));
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let loader = ConfigLoader::with_search_paths(vec![]);

    let err = loader.load(Some(&missing)).unwrap_err();
    assert!(matches!(err, Error::ConfigLoadFailed { path, .. } if path == missing));
}

#[test]
fn test_malformed_toml_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.toml", "[pty\ndefault_rows = ");

    let err = ConfigLoader::load_config_file(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_zero_buffer_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "zero.toml", "[pty]\nread_buffer_size = 0\n");

    let err = ConfigLoader::load_config_file(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::ConfigValidationFailed { ref field, .. } if field == "pty.read_buffer_size"
    ));
}

#[test]
fn test_unknown_sections_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "extra.toml", "[ui]\ntheme = \"dark\"\n");

    let config = ConfigLoader::load_config_file(&path).unwrap();
    assert_eq!(config, Config::default());
}
