use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "convoy", about = "Reputation engine for vehicle data exchange")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the honest/malicious round simulation
    Simulate {
        /// Config file (TOML, or JSON with a .json extension)
        #[arg(long, env = "CONVOY_CONFIG")]
        config: Option<PathBuf>,
        /// Number of vehicles
        #[arg(long)]
        agents: Option<usize>,
        /// Ids of misbehaving vehicles (repeatable)
        #[arg(long, num_args = 1..)]
        malicious: Option<Vec<String>>,
        /// Number of rounds
        #[arg(long)]
        rounds: Option<usize>,
        /// Seed for synthetic trajectories
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show effective configuration
    Show {
        #[arg(long, env = "CONVOY_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        #[arg(long, env = "CONVOY_CONFIG")]
        config: Option<PathBuf>,
    },
}
