//! Command-line interface definitions.
//!
//! Defines the CLI structure for clusterator using `clap`. Cluster commands
//! take host names in operator order; the first host bootstraps discovery.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bootstrap a consul + swarm + registrator cluster across docker-machine hosts
#[derive(Parser, Debug)]
#[command(name = "clusterator")]
#[command(version)]
pub struct Cli {
    /// Configuration file [default: ~/.clusterator/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Form the consul quorum, then launch swarm and registrator everywhere
    Create(HostsArgs),

    /// Remove every cluster container from each host
    Destroy(HostsArgs),

    /// Form the consul quorum only
    Consul(HostsArgs),

    /// Remove and relaunch registrator on each host
    Registrator(HostsArgs),

    /// Print each host's address
    Ip(HostsArgs),

    /// Print a host's machine record
    Json(HostArg),

    /// Print docker client flags for a host
    Config(HostArg),

    /// List all containers on a host
    Ps(HostArg),

    /// Print each host's engine URL
    Url(HostsArgs),

    /// Start the machine behind each host
    #[command(alias = "startmachines")]
    StartMachines(HostsArgs),
}

/// Arguments for commands acting on several hosts.
#[derive(Args, Debug)]
pub struct HostsArgs {
    /// Machine names; the first one bootstraps discovery
    #[arg(required = true, value_name = "HOST")]
    pub hosts: Vec<String>,
}

/// Arguments for commands acting on one host.
#[derive(Args, Debug)]
pub struct HostArg {
    /// Machine name
    #[arg(value_name = "HOST")]
    pub host: String,
}
