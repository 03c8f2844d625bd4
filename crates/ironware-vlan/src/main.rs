//! vlanread - IronWare VLAN membership tool
//!
//! Reads VLAN membership from a captured dump or a live device, projects it
//! onto interfaces, and plans the commands reaching a desired state.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli_unit_common::{
    CliSource, LoggingConfig, ShellSource, SourceConfig, StaticSource, UnitConfig,
    DEFAULT_CONFIG_PATH,
};
use cli_vlan_types::{compress, expand, RangeToken, VlanId};
use ironware_vlan::{
    canonical_interface, plan_interface_removal, plan_interface_vlans, read_interface_vlans,
    read_vlans, vlan_ids, InterfaceMode, InterfaceVlanConfig, ParseCache, SwitchedVlanIntent,
};

/// IronWare VLAN membership reader and planner
#[derive(Parser, Debug)]
#[command(name = "vlanread")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Captured `show running-config vlan` output to read instead of a device
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Shell prefix reaching the device, e.g. "ssh admin@sw1"
    #[arg(short = 'x', long)]
    exec_prefix: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured VLANs
    Vlans,

    /// Show the VLAN configuration of interfaces
    Project {
        /// Interface names, e.g. "ethernet 1/1"
        #[arg(required = true)]
        interfaces: Vec<String>,
    },

    /// Compress VLAN IDs into range tokens
    Compress {
        #[arg(required = true)]
        ids: Vec<VlanId>,
    },

    /// Expand range tokens such as 10..20 into VLAN IDs
    Expand {
        #[arg(required = true)]
        tokens: Vec<RangeToken>,
    },

    /// Plan the commands moving an interface to a VLAN configuration
    Plan {
        /// Interface name
        interface: String,

        /// Switchport mode (access or trunk)
        #[arg(long)]
        mode: InterfaceMode,

        /// Access VLAN
        #[arg(long)]
        access: Option<VlanId>,

        /// Native VLAN of a trunk
        #[arg(long)]
        native: Option<VlanId>,

        /// Trunk VLANs, comma separated (e.g. 10..20,30)
        #[arg(long, value_delimiter = ',')]
        trunk: Vec<RangeToken>,
    },

    /// Plan the commands removing every VLAN membership of an interface
    Remove {
        /// Interface name
        interface: String,
    },
}

/// Projected interface configuration as printed by `project`
#[derive(Debug, Serialize)]
struct ProjectionReport {
    interface: String,
    #[serde(flatten)]
    config: InterfaceVlanConfig,
    trunk_ranges: Vec<RangeToken>,
}

/// Initializes tracing/logging subsystem
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(logging.target)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Loads the config file and applies command line overrides
fn load_config(args: &Args) -> anyhow::Result<UnitConfig> {
    let mut config = UnitConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if let Some(input) = &args.input {
        config.source.input_file = Some(input.clone());
    }
    if let Some(prefix) = &args.exec_prefix {
        config.source.exec_prefix = Some(prefix.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Picks the source of raw CLI output; a captured dump wins over a device
fn open_source(source: &SourceConfig) -> anyhow::Result<Box<dyn CliSource>> {
    if let Some(path) = &source.input_file {
        let captured = StaticSource::from_file(path)
            .with_context(|| format!("Failed to read captured output {}", path.display()))?;
        return Ok(Box::new(captured));
    }
    match &source.exec_prefix {
        Some(prefix) => Ok(Box::new(ShellSource::new(prefix.clone()))),
        None => bail!("No VLAN source configured; pass --input or --exec-prefix"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, config: &UnitConfig) -> anyhow::Result<()> {
    let show = config.source.show_vlan_command.as_str();
    let mut cache = ParseCache::new();

    match command {
        Command::Compress { ids } => print_json(&compress(&ids)),
        Command::Expand { tokens } => print_json(&expand(&tokens)?),
        Command::Vlans => {
            let source = open_source(&config.source)?;
            let vlans = read_vlans(source.as_ref(), &mut cache, show).await?;
            info!("Found {} VLANs", vlans.len());
            print_json(&vlans)
        }
        Command::Project { interfaces } => {
            let source = open_source(&config.source)?;
            let mut reports = Vec::with_capacity(interfaces.len());
            for interface in &interfaces {
                let config = read_interface_vlans(source.as_ref(), &mut cache, show, interface)
                    .await
                    .with_context(|| format!("Failed to read VLANs of {}", interface))?;
                reports.push(ProjectionReport {
                    interface: canonical_interface(interface),
                    trunk_ranges: config.trunk_ranges(),
                    config,
                });
            }
            print_json(&reports)
        }
        Command::Plan {
            interface,
            mode,
            access,
            native,
            trunk,
        } => {
            let source = open_source(&config.source)?;
            let current =
                read_interface_vlans(source.as_ref(), &mut cache, show, &interface).await?;
            let known = vlan_ids(&read_vlans(source.as_ref(), &mut cache, show).await?);
            let intent = SwitchedVlanIntent {
                mode,
                access_vlan: access,
                native_vlan: native,
                trunk_vlans: trunk,
            };
            let commands = plan_interface_vlans(&interface, &current, &intent, &known)
                .with_context(|| format!("Cannot apply VLAN configuration to {}", interface))?;
            print_json(&commands)
        }
        Command::Remove { interface } => {
            let source = open_source(&config.source)?;
            let current =
                read_interface_vlans(source.as_ref(), &mut cache, show, &interface).await?;
            print_json(&plan_interface_removal(&interface, &current)?)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("vlanread: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging);

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_parse_plan() {
        let args = Args::parse_from([
            "vlanread",
            "--input",
            "dump.txt",
            "plan",
            "ethernet 1/1",
            "--mode",
            "trunk",
            "--trunk",
            "10..12,20",
            "--native",
            "5",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("dump.txt")));
        match args.command {
            Command::Plan {
                interface,
                mode,
                native,
                trunk,
                ..
            } => {
                assert_eq!(interface, "ethernet 1/1");
                assert_eq!(mode, InterfaceMode::Trunk);
                assert_eq!(native, VlanId::new(5).ok());
                assert_eq!(trunk.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_reject_bad_range() {
        assert!(Args::try_parse_from(["vlanread", "expand", "20..10"]).is_err());
        assert!(Args::try_parse_from(["vlanread", "compress", "4095"]).is_err());
    }

    #[test]
    fn test_open_source_requires_a_source() {
        assert!(open_source(&SourceConfig::default()).is_err());

        let shell = SourceConfig {
            exec_prefix: Some("ssh admin@sw1".to_string()),
            ..Default::default()
        };
        assert!(open_source(&shell).is_ok());
    }

    #[test]
    fn test_load_config_overrides() {
        let args = Args::parse_from([
            "vlanread",
            "--config",
            "/nonexistent/vlanread.toml",
            "--exec-prefix",
            "ssh admin@sw1",
            "--log-level",
            "debug",
            "vlans",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.source.exec_prefix.as_deref(), Some("ssh admin@sw1"));
        assert_eq!(config.logging.level, "debug");
    }
}
