use clap::Parser;

use clusterator::adapter::inbound::cli::command::{Cli, ColorChoice};
use clusterator::adapter::inbound::cli::diagnostic::ConfigDiagnostic;
use clusterator::adapter::inbound::cli::output::{self, OutputConfig};
use clusterator::adapter::inbound::cli::{dispatch, operator};
use clusterator::error::Error;
use clusterator::infrastructure::config::settings::Config;
use clusterator::infrastructure::operator::entry;

fn report(error: &Error, config_toml: Option<&str>) {
    let diagnostic = config_toml.and_then(|src| ConfigDiagnostic::from_error(error, src));
    match diagnostic {
        Some(diagnostic) if !output::is_json() => {
            eprintln!("{:?}", miette::Report::new(diagnostic));
        }
        _ => output::error(&error.to_string()),
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let config_toml = match dispatch::load_config_toml(cli.config.as_deref()) {
        Ok(content) => content,
        Err(e) => {
            report(&e, None);
            std::process::exit(1);
        }
    };

    let mut config = match Config::from_optional_toml(config_toml.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report(&e, config_toml.as_deref());
            std::process::exit(1);
        }
    };

    config.logging = config.logging.with_cli_flags(cli.quiet, cli.verbose);
    config.init_logging();

    if operator::install(entry::operator()).is_err() {
        output::error("operator already installed");
        std::process::exit(1);
    }

    if let Err(e) = dispatch::execute(&cli, config_toml.clone()).await {
        report(&e, config_toml.as_deref());
        std::process::exit(1);
    }
}
