use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .without_time()
        .init();

    match Cli::parse().command {
        Command::Download(args) => commands::download::run(args).await,
        Command::Upload(args) => commands::upload::run(args).await,
        Command::Peers(args) => commands::peers::run(args).await,
    }
}
