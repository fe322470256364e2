/// Configuration loading tests
/// Files are read from temporary directories; environment overrides live in
/// their own test binary so they cannot leak into these cases.
use lull_core::{SoundCatalog, SoundTag};
use lulld::{DaemonConfig, DaemonError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("lulld.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[service]
tick_interval_ms = 25

[service.playback]
default_volume = 0.5
fade_out_ms = 0

[storage]
path = "/tmp/lull-test/store.json"

[[sounds]]
key = "rain"
tags = ["relax", "focus"]

[[sounds]]
key = "thunder"
tags = ["relax"]
is_looping = false
"#,
    );

    let config = DaemonConfig::load(Some(&path)).unwrap();
    config.validate().unwrap();

    assert_eq!(config.service.tick_interval_ms, 25);
    assert!((config.service.playback.default_volume - 0.5).abs() < f32::EPSILON);
    assert_eq!(config.service.playback.fade_out_ms, 0);
    // Unset playback fields keep their defaults
    assert_eq!(config.service.playback.default_time_period_secs, 60);
    assert_eq!(config.storage.path, PathBuf::from("/tmp/lull-test/store.json"));

    let catalog = config.catalog();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get("thunder").is_some_and(|s| !s.is_looping));
    assert_eq!(catalog.filter(Some(SoundTag::Focus)).len(), 1);
}

#[test]
fn test_sparse_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[service]\ntick_interval_ms = 40\n");

    let config = DaemonConfig::load(Some(&path)).unwrap();

    assert_eq!(config.service.tick_interval_ms, 40);
    assert_eq!(config.sounds, DaemonConfig::default().sounds);
    assert_eq!(config.storage.path, PathBuf::from("./data/lull.json"));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = DaemonConfig::load(Some(&missing));
    assert!(matches!(result, Err(DaemonError::Config(_))));
}

#[test]
fn test_unknown_tag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[[sounds]]\nkey = \"rain\"\ntags = [\"sleepy\"]\n");

    assert!(matches!(
        DaemonConfig::load(Some(&path)),
        Err(DaemonError::Config(_))
    ));
}

#[test]
fn test_duplicate_sounds_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[[sounds]]\nkey = \"rain\"\n\n[[sounds]]\nkey = \"rain\"\n",
    );

    let config = DaemonConfig::load(Some(&path)).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Duplicate sound key"));
}
