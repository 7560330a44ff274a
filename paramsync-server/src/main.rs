//! paramsync - multi-master parameter synchronization daemon
//!
//! Every master periodically publishes its admitted parameters on a UDP
//! multicast group and applies novel values heard from its peers.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::effective_config(&cli.overrides)?;
    init_tracing(config.verbose);
    let config_path = commands::config_path(&cli.overrides);
    tracing::info!("{}", commands::describe_config_source(&config_path));

    match cli.command {
        None | Some(Commands::Run) => commands::handle_run(config).await,
        Some(Commands::Config(cmd)) => {
            commands::handle_config_command(cmd, &config, &cli.overrides)
        }
        Some(Commands::Check { keys }) => commands::handle_check(&config, &keys),
        Some(Commands::Encode { value }) => commands::handle_encode(&value),
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` when verbose.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
