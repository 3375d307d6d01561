use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Usage analytics for the AI tool catalog.
#[derive(Parser, Debug)]
#[command(name = "usage-insights", version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file (defaults to <config dir>/usage-insights/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the analytics API (default)
    Serve {
        /// Override the configured port for this run only
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print one analytics report as JSON
    Report {
        /// Time range: 1h, 24h, 7d or 30d
        #[arg(short, long)]
        range: Option<String>,
        /// Comma-separated tool ids
        #[arg(long)]
        tools: Option<String>,
        /// Comma-separated model names
        #[arg(long)]
        models: Option<String>,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Serve { port: None })
    }
}
