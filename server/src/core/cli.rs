use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_PORT, ENV_POSTGRES_URL, ENV_REPAIR_LOOKBACK_DAYS,
    ENV_REPAIR_MAX_ROWS,
};

#[derive(Parser)]
#[command(name = "hard75")]
#[command(version, about = "Squad accountability tracker for the 75 Hard challenge", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection URL
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Repair lookback window in days (how far back completion dates are healed)
    #[arg(long, global = true, env = ENV_REPAIR_LOOKBACK_DAYS)]
    pub repair_lookback_days: Option<u32>,

    /// Maximum completion rows examined per repair pass
    #[arg(long, global = true, env = ENV_REPAIR_MAX_ROWS)]
    pub repair_max_rows: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Start,
}

/// Snapshot of CLI options relevant to configuration loading
#[derive(Debug, Default, Clone)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub postgres_url: Option<String>,
    pub repair_lookback_days: Option<u32>,
    pub repair_max_rows: Option<u32>,
}

/// Parse CLI arguments into a config snapshot and an optional command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();

    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        postgres_url: cli.postgres_url,
        repair_lookback_days: cli.repair_lookback_days,
        repair_max_rows: cli.repair_max_rows,
    };

    (config, cli.command)
}
