//! Acquisition of raw `show` output from a device.
//!
//! [`CliSource`] is the boundary to the transport: a unit asks for the output
//! of one command and gets back the unparsed text. How the device is reached
//! is up to the implementation:
//!
//! - [`StaticSource`]: captured outputs, for offline runs and tests
//! - [`ShellSource`]: runs the command through a shell prefix such as an
//!   `ssh` invocation
//!
//! # Example
//!
//! ```ignore
//! use cli_unit_common::{CliSource, ShellSource};
//!
//! let source = ShellSource::new("ssh admin@sw1");
//! let dump = source.show("show running-config vlan").await?;
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{UnitError, UnitResult};

/// Shell used to run [`ShellSource`] commands.
pub const SH_CMD: &str = "/bin/sh";

/// Characters with special meaning inside shell double quotes.
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Wraps `s` in double quotes, escaping `$`, `` ` ``, `"`, `\` and newline.
///
/// ```
/// use cli_unit_common::shellquote;
///
/// assert_eq!(shellquote("show vlan"), "\"show vlan\"");
/// assert_eq!(shellquote("a$b"), "\"a\\$b\"");
/// ```
pub fn shellquote(s: &str) -> String {
    format!("\"{}\"", SHELL_ESCAPE_RE.replace_all(s, r"\$1"))
}

/// Source of raw CLI output.
#[async_trait]
pub trait CliSource: Send + Sync {
    /// Returns the raw output of `command`.
    async fn show(&self, command: &str) -> UnitResult<String>;
}

/// Serves previously captured command output.
///
/// Counts how often it is queried so callers can verify that a read pass
/// hits the device only once.
#[derive(Debug, Default)]
pub struct StaticSource {
    outputs: HashMap<String, String>,
    fallback: Option<String>,
    calls: AtomicUsize,
}

impl StaticSource {
    /// Creates a source with no captured output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the output returned for `command`.
    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    /// Registers the output returned for any command without its own entry.
    pub fn with_fallback(mut self, output: impl Into<String>) -> Self {
        self.fallback = Some(output.into());
        self
    }

    /// Uses the contents of a captured dump as the fallback output.
    pub fn from_file(path: impl AsRef<Path>) -> UnitResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), bytes = text.len(), "Loaded captured CLI output");
        Ok(Self::new().with_fallback(text))
    }

    /// Number of `show` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CliSource for StaticSource {
    async fn show(&self, command: &str) -> UnitResult<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.outputs
            .get(command)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| UnitError::internal(format!("no captured output for '{}'", command)))
    }
}

/// Runs `<prefix> "<command>"` through `/bin/sh -c` and returns stdout.
#[derive(Debug, Clone)]
pub struct ShellSource {
    prefix: String,
}

impl ShellSource {
    /// Creates a shell source, e.g. `ShellSource::new("ssh admin@sw1")`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full shell command line used to run `command`.
    pub fn command_line(&self, command: &str) -> String {
        format!("{} {}", self.prefix, shellquote(command))
    }
}

#[async_trait]
impl CliSource for ShellSource {
    async fn show(&self, command: &str) -> UnitResult<String> {
        let cmd = self.command_line(command);
        debug!(command = %cmd, "Querying device");

        let output = Command::new(SH_CMD)
            .arg("-c")
            .arg(&cmd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| UnitError::ShellExec {
                command: cmd.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let exit_code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(command = %cmd, exit_code, stderr = %stderr, "Device query failed");

        Err(UnitError::ShellCommandFailed {
            command: cmd,
            exit_code,
            output: if stderr.is_empty() {
                stdout.trim().to_string()
            } else {
                stderr
            },
        })
    }
}
