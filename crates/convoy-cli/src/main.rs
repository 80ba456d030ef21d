use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use convoy_cli::cli::{Cli, Commands};
use convoy_cli::commands;
use convoy_cli::commands::simulate::SimulateArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate {
            config,
            agents,
            malicious,
            rounds,
            seed,
            json,
        } => {
            commands::simulate::run(SimulateArgs {
                config,
                agents,
                malicious,
                rounds,
                seed,
                json,
            })
            .await
        }
        Commands::Config { action } => commands::config::handle(action).await,
    }
}
