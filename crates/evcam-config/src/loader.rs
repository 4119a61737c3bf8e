// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Implements the 3-tier configuration loading order:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, ConfigError, ConfigResult, ViewerConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "evcam_configuration.toml";

/// Find the evcam configuration file
///
/// Search order:
/// 1. `EVCAM_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Ancestor directories (up to 5 levels, for workspace roots)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("EVCAM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by EVCAM_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet EVCAM_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file with all overrides applied
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, searches for one.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns an error if the file is missing, contains invalid TOML, or fails
/// validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ViewerConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: ViewerConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply `EVCAM_*` environment variable overrides
///
/// Recognized variables:
/// - `EVCAM_SENSOR_NAME`
/// - `EVCAM_SHOW_CD` ("true"/"false")
/// - `EVCAM_SHOW_GRAYLEVELS` ("true"/"false")
/// - `EVCAM_ACCUMULATION_WINDOW_US`
/// - `EVCAM_LOG_LEVEL`
pub fn apply_environment_overrides(config: &mut ViewerConfig) {
    if let Ok(value) = env::var("EVCAM_SENSOR_NAME") {
        config.sensor_name = value;
    }
    if let Ok(value) = env::var("EVCAM_SHOW_CD") {
        if let Ok(flag) = value.parse() {
            config.enable_cd_display = flag;
        }
    }
    if let Ok(value) = env::var("EVCAM_SHOW_GRAYLEVELS") {
        if let Ok(flag) = value.parse() {
            config.enable_graylevel_display = flag;
        }
    }
    if let Ok(value) = env::var("EVCAM_ACCUMULATION_WINDOW_US") {
        if let Ok(window) = value.parse() {
            config.accumulation_window_us = window;
        }
    }
    if let Ok(value) = env::var("EVCAM_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides (highest priority)
///
/// Keys mirror the config fields: `sensor-name`, `show-cd`,
/// `show-graylevels`, `accumulation-window-us`, `log-level`.
pub fn apply_cli_overrides(config: &mut ViewerConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("sensor-name") {
        config.sensor_name = value.clone();
    }
    if let Some(value) = cli_args.get("show-cd") {
        if let Ok(flag) = value.parse() {
            config.enable_cd_display = flag;
        }
    }
    if let Some(value) = cli_args.get("show-graylevels") {
        if let Ok(flag) = value.parse() {
            config.enable_graylevel_display = flag;
        }
    }
    if let Some(value) = cli_args.get("accumulation-window-us") {
        if let Ok(window) = value.parse() {
            config.accumulation_window_us = window;
        }
    }
    if let Some(value) = cli_args.get("log-level") {
        config.logging.level = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Environment variables are process-global; tests that call load_config
    // serialize on this lock so a concurrent test's EVCAM_* variables cannot
    // leak into another test's result.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn load_explicit_path() {
        let _env = env_guard();
        let (_dir, path) = write_config(
            r#"
            sensor_name = "hvga"
            enable_graylevel_display = true

            [logging]
            level = "debug"
            "#,
        );

        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.sensor_name, "hvga");
        assert!(config.enable_graylevel_display);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.accumulation_window_us, 5_000);
    }

    #[test]
    fn cli_overrides_beat_file_values() {
        let _env = env_guard();
        let (_dir, path) = write_config(r#"accumulation_window_us = 2000"#);

        let mut cli = HashMap::new();
        cli.insert("accumulation-window-us".to_string(), "7500".to_string());
        cli.insert("show-cd".to_string(), "false".to_string());

        let config = load_config(Some(&path), Some(&cli)).unwrap();
        assert_eq!(config.accumulation_window_us, 7_500);
        assert!(!config.enable_cd_display);
    }

    #[test]
    fn invalid_window_in_file_fails_validation() {
        let _env = env_guard();
        let (_dir, path) = write_config(r#"accumulation_window_us = 0"#);
        let result = load_config(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let _env = env_guard();
        let (_dir, path) = write_config("sensor_name = ");
        let result = load_config(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn environment_overrides_land_on_every_field() {
        let _env = env_guard();
        let (_dir, path) = write_config(
            r#"
            sensor_name = "from_file"
            enable_cd_display = true
            enable_graylevel_display = false
            accumulation_window_us = 2000

            [logging]
            level = "info"
            "#,
        );

        env::set_var("EVCAM_SENSOR_NAME", "from_env");
        env::set_var("EVCAM_SHOW_CD", "false");
        env::set_var("EVCAM_SHOW_GRAYLEVELS", "true");
        env::set_var("EVCAM_ACCUMULATION_WINDOW_US", "12345");
        env::set_var("EVCAM_LOG_LEVEL", "warn");

        let result = load_config(Some(&path), None);

        env::remove_var("EVCAM_SENSOR_NAME");
        env::remove_var("EVCAM_SHOW_CD");
        env::remove_var("EVCAM_SHOW_GRAYLEVELS");
        env::remove_var("EVCAM_ACCUMULATION_WINDOW_US");
        env::remove_var("EVCAM_LOG_LEVEL");

        let config = result.unwrap();
        assert_eq!(config.sensor_name, "from_env");
        assert!(!config.enable_cd_display);
        assert!(config.enable_graylevel_display);
        assert_eq!(config.accumulation_window_us, 12_345);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn unparseable_environment_values_are_ignored() {
        let _env = env_guard();
        let (_dir, path) = write_config(r#"accumulation_window_us = 2000"#);

        env::set_var("EVCAM_ACCUMULATION_WINDOW_US", "not-a-number");
        env::set_var("EVCAM_SHOW_CD", "yes");

        let result = load_config(Some(&path), None);

        env::remove_var("EVCAM_ACCUMULATION_WINDOW_US");
        env::remove_var("EVCAM_SHOW_CD");

        let config = result.unwrap();
        assert_eq!(config.accumulation_window_us, 2_000);
        assert!(config.enable_cd_display);
    }
}
