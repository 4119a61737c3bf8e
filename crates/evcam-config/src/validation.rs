// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation

use crate::{ConfigError, ConfigResult, ViewerConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a fully-assembled configuration.
///
/// # Errors
///
/// Returns `ConfigError::Validation` describing the first violated rule.
pub fn validate_config(config: &ViewerConfig) -> ConfigResult<()> {
    if config.accumulation_window_us == 0 {
        return Err(ConfigError::Validation(
            "accumulation_window_us must be > 0".to_string(),
        ));
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of {:?}, got '{}'",
            LOG_LEVELS, config.logging.level
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ViewerConfig::default()).is_ok());
    }

    #[test]
    fn zero_window_rejected() {
        let mut config = ViewerConfig::default();
        config.accumulation_window_us = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_log_level_rejected() {
        let mut config = ViewerConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }
}
