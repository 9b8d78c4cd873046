//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::path::PathBuf;

use diorama::config::AppConfig;
use serial_test::serial;

fn temp_config_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("diorama_config_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("DIORAMA_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("DIORAMA_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    std::env::remove_var("DIORAMA_WINDOW__TITLE");

    let config = AppConfig::load().unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.window.title, defaults.window.title);
    assert_eq!(config.camera.position, defaults.camera.position);
    assert_eq!(config.lighting.sky_color, 0xb1e1ff);
    assert_eq!(config.fog.density, 0.03);
    assert_eq!(config.rendering.background_color, defaults.rendering.background_color);
    assert_eq!(config.scene.path, defaults.scene.path);
    assert_eq!(config.lighting(), defaults.lighting());
}

#[test]
#[serial]
fn test_user_file_overrides_default_file() {
    let dir = temp_config_dir("user");
    std::fs::write(dir.join("default.toml"), "[window]\ntitle = \"Base\"\nwidth = 800\n").unwrap();
    std::fs::write(dir.join("user.toml"), "[window]\ntitle = \"Mine\"\n\n[fog]\nenabled = false\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.window.title, "Mine");
    assert_eq!(config.window.width, 800);
    assert_eq!(config.window.height, 720);
    assert_eq!(config.lighting().fog.density, 0.0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
#[serial]
fn test_nested_env_override_wins_over_files() {
    let dir = temp_config_dir("env");
    std::fs::write(dir.join("default.toml"), "[debug]\nstart_paused = false\n").unwrap();

    std::env::set_var("DIORAMA_DEBUG__START_PAUSED", "true");
    std::env::set_var("DIORAMA_CAMERA__FOV", "60.0");
    let config = AppConfig::load_from(&dir);
    std::env::remove_var("DIORAMA_DEBUG__START_PAUSED");
    std::env::remove_var("DIORAMA_CAMERA__FOV");

    let config = config.unwrap();
    assert!(config.debug.start_paused);
    assert_eq!(config.camera().fov_deg, 60.0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
#[serial]
fn test_invalid_value_is_an_error() {
    let dir = temp_config_dir("invalid");
    std::fs::write(dir.join("default.toml"), "[window]\nwidth = \"wide\"\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));

    std::fs::remove_dir_all(&dir).ok();
}
