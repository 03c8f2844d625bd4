//! Configuration file support for CLI units.
//!
//! Loads and validates unit configuration from TOML files.
//! Default location: /etc/sonic/vlanread.toml

use crate::error::{UnitError, UnitResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/vlanread.toml";

/// Log levels accepted in `[logging] level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// How raw CLI output is obtained
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Command whose output lists VLANs and their members
    #[serde(default = "default_show_vlan_command")]
    pub show_vlan_command: String,

    /// Shell prefix used to reach the device (e.g. `ssh admin@sw1`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_prefix: Option<String>,

    /// Previously captured dump, used instead of querying the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Include the event target in log lines
    #[serde(default = "default_log_target")]
    pub target: bool,
}

/// Complete unit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_show_vlan_command() -> String {
    "show running-config vlan".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_target() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            show_vlan_command: default_show_vlan_command(),
            exec_prefix: None,
            input_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            target: default_log_target(),
        }
    }
}

impl UnitConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> UnitResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                UnitError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(UnitError::Io(e)),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> UnitResult<()> {
        if self.source.show_vlan_command.trim().is_empty() {
            return Err(UnitError::invalid_config(
                "source.show_vlan_command",
                "must not be empty",
            ));
        }

        if let Some(prefix) = &self.source.exec_prefix {
            if prefix.trim().is_empty() {
                return Err(UnitError::invalid_config(
                    "source.exec_prefix",
                    "must not be empty when set",
                ));
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(UnitError::invalid_config(
                "logging.level",
                format!(
                    "unknown level '{}', expected one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}
