//! Error types for CLI unit operations.
//!
//! Two classes of failure exist. Transport failures (the device could not be
//! queried) may succeed on retry. Validation failures (an invalid VLAN
//! range, a desired configuration that contradicts the device) abort the
//! operation and are surfaced to the user as apply failures.

use cli_vlan_types::VlanError;
use std::io;
use thiserror::Error;

/// Result type alias for CLI unit operations.
pub type UnitResult<T> = Result<T, UnitError>;

/// Errors that can occur while reading from or writing to a device.
#[derive(Debug, Error)]
pub enum UnitError {
    /// Failed to spawn the command used to reach the device.
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Device command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// Reading a captured dump or config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be parsed or serialized.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration value failed validation.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Desired state is inconsistent with itself or with the device.
    #[error("Precondition violated: {message}")]
    PreconditionViolated {
        /// Error message.
        message: String,
    },

    /// VLAN ID or range validation failed.
    #[error(transparent)]
    Vlan(#[from] VlanError),

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl UnitError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a precondition violation.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolated {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient transport condition
    /// that may succeed on retry. Validation errors never are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UnitError::ShellExec { .. } | UnitError::ShellCommandFailed { .. }
        )
    }
}
