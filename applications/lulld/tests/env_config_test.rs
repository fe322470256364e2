/// Environment override test
/// Kept alone in this binary because it mutates process environment.
use lulld::DaemonConfig;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lulld.toml");
    fs::write(&path, "[service]\ntick_interval_ms = 25\n").unwrap();

    env::set_var("LULL_SERVICE__TICK_INTERVAL_MS", "75");
    env::set_var("LULL_SERVICE__PLAYBACK__FADE_OUT_MS", "0");
    let loaded = DaemonConfig::load(Some(&path));
    env::remove_var("LULL_SERVICE__TICK_INTERVAL_MS");
    env::remove_var("LULL_SERVICE__PLAYBACK__FADE_OUT_MS");

    let config = loaded.unwrap();
    assert_eq!(config.service.tick_interval_ms, 75);
    assert_eq!(config.service.playback.fade_out_ms, 0);
}
