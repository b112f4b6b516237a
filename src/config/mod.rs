pub mod toml_config;

#[cfg(feature = "cli")]
use crate::render::OutputFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fpl-cup")]
#[command(about = "Group-stage cup draw, fixtures and standings for a Fantasy Premier League league")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "cup.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override tournament.current_gameweek
    #[arg(long)]
    pub current_gameweek: Option<u32>,

    /// Override tournament.seed for the random draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override output.format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the fixture list along with the standings
    #[arg(long)]
    pub fixtures: bool,

    /// Draw groups and print fixtures without fetching any results
    #[arg(long)]
    pub dry_run: bool,
}
