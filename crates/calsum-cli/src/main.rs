use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use calsum_cli::commands::{events, rules, summary};
use calsum_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout stays clean for JSON output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Summary { filter, json }) => {
            let config = load_config(cli.config.as_deref())?;
            summary::run(filter, &config, *json)?;
        }
        Some(Commands::Events { filter }) => {
            let config = load_config(cli.config.as_deref())?;
            events::run(filter, &config)?;
        }
        Some(Commands::Rules { rules: rule_files }) => {
            let config = load_config(cli.config.as_deref())?;
            rules::run(rule_files, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
