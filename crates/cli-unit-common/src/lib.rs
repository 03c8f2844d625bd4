//! Common infrastructure for device CLI translation units.
//!
//! A CLI unit reads unstructured `show` output from a network device,
//! turns it into a structured model, and renders desired state back into
//! device commands. This crate holds the parts every unit shares:
//!
//! - [`source`]: the [`CliSource`] seam through which raw output is fetched
//! - [`config`]: TOML configuration for units and their binaries
//! - [`error`]: error types for unit operations

pub mod config;
pub mod error;
pub mod source;

// Re-export commonly used items at crate root
pub use config::{LoggingConfig, SourceConfig, UnitConfig, DEFAULT_CONFIG_PATH};
pub use error::{UnitError, UnitResult};
pub use source::{shellquote, CliSource, ShellSource, StaticSource};
