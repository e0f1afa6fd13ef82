//! Application settings data model.

use serde::{Deserialize, Serialize};

/// Settings for background operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationSettings {
    /// JPEG quality used when re-encoding a rotated image (1-100)
    pub jpeg_quality: u8,
    /// Upper bound for draining before exit, in milliseconds (0 = wait forever)
    pub drain_timeout_ms: u64,
}

impl Default for OperationSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            drain_timeout_ms: 0,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Whether to also write a daily log file into the logs directory
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            file_logging: true,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub operations: OperationSettings,
    pub logging: LoggingSettings,
}
