// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Default accumulation window, microseconds (a few milliseconds of events
/// per displayed frame).
pub const DEFAULT_ACCUMULATION_WINDOW_US: u64 = 5_000;

/// Complete viewer configuration, loaded from `evcam_configuration.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Sensor name, used by the transport layer to namespace topics
    pub sensor_name: String,

    /// Enable the change-detection frame pipeline
    pub enable_cd_display: bool,

    /// Enable the independent gray-level image side channel
    pub enable_graylevel_display: bool,

    /// Accumulation window duration in microseconds
    pub accumulation_window_us: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sensor_name: String::new(),
            enable_cd_display: true,
            enable_graylevel_display: false,
            accumulation_window_us: DEFAULT_ACCUMULATION_WINDOW_US,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
