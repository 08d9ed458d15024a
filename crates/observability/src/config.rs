//! Configuration for observability

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ObservabilityError;

const DEFAULT_SERVICE_NAME: &str = "chatbridge";

/// Line layout of the stderr log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ObservabilityError::Config(format!(
                "unknown log format '{}', expected 'full' or 'compact'",
                other
            ))),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Service name recorded on the root span
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Service version (optional)
    #[serde(default)]
    pub service_version: Option<String>,

    /// Log level filter (e.g., "info", "chatbridge_runtime=debug").
    /// Falls back to `RUST_LOG`, then "info", when unset
    #[serde(default)]
    pub log_level: Option<String>,

    /// Emit ANSI color codes
    #[serde(default = "default_ansi")]
    pub ansi: bool,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_ansi() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: None,
            log_level: None,
            ansi: default_ansi(),
            format: LogFormat::default(),
        }
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Build from environment variables
    ///
    /// Reads:
    /// - `CHATBRIDGE_SERVICE_NAME` → service_name
    /// - `CHATBRIDGE_LOG` or `RUST_LOG` → log_level
    /// - `CHATBRIDGE_LOG_FORMAT` → format (ignored when unrecognised)
    /// - `NO_COLOR` → disables ansi
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let service_name = lookup("CHATBRIDGE_SERVICE_NAME").unwrap_or_else(default_service_name);

        let log_level = lookup("CHATBRIDGE_LOG").or_else(|| lookup("RUST_LOG"));

        let format = lookup("CHATBRIDGE_LOG_FORMAT")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        let ansi = lookup("NO_COLOR").map_or(true, |v| v.is_empty());

        Self {
            service_name,
            service_version: None,
            log_level,
            ansi,
            format,
        }
    }
}
