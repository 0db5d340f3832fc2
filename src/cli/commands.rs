use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `whalewatch` - data-quality gate for whale snapshot analytics.
#[derive(Parser, Debug)]
#[command(name = "whalewatch")]
#[command(version)]
#[command(
    about = "Validate whale snapshot data and gate downstream analytics on its quality.",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: ~/.whalewatch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every configured check once and print the report.
    ///
    /// Exit code: 0 healthy, 1 degraded, 2 critical.
    Validate {
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Override the lookback window in hours
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Validate every `scheduler.interval_hours` and send gate alerts
    Watch,

    /// Create the database and its schema
    InitDb,
}
