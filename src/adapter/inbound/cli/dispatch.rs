//! Routes parsed commands to their handlers.

use std::path::Path;

use super::command::{Cli, Commands};
use super::{cluster, inspect, operator, output};
use crate::error::Result;
use crate::port::inbound::operator::cluster::ClusterRequest;

/// Execute a parsed command line with already-resolved configuration.
pub async fn execute(cli: &Cli, config_toml: Option<String>) -> Result<()> {
    let request = |hosts: &[String]| ClusterRequest {
        config_toml: config_toml.clone(),
        hosts: hosts.to_vec(),
    };

    match &cli.command {
        Commands::Create(args) => cluster::create(&request(&args.hosts)).await,
        Commands::Destroy(args) => cluster::destroy(&request(&args.hosts)).await,
        Commands::Consul(args) => cluster::consul(&request(&args.hosts)).await,
        Commands::Registrator(args) => cluster::registrator(&request(&args.hosts)).await,
        Commands::Ip(args) => inspect::ip(&request(&args.hosts)).await,
        Commands::Url(args) => inspect::url(&request(&args.hosts)).await,
        Commands::Json(arg) => inspect::json(&request(&[]), &arg.host).await,
        Commands::Config(arg) => inspect::config(&request(&[]), &arg.host).await,
        Commands::Ps(arg) => inspect::ps(&request(&[]), &arg.host).await,
        Commands::StartMachines(args) => inspect::start_machines(&request(&args.hosts)).await,
    }
}

/// Read the configuration for this invocation, reporting where it came from.
pub fn load_config_toml(explicit: Option<&Path>) -> Result<Option<String>> {
    let content = operator::resolve_config_toml(explicit)?;
    if output::verbosity() > 0 && content.is_none() {
        output::note("no configuration file found; using defaults");
    }
    Ok(content)
}
