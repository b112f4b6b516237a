pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::file::{LeagueSnapshot, ResultsFile};
pub use adapters::fpl::FplClient;
pub use config::toml_config::TournamentConfig;
pub use self::core::partition::{partition_groups, PartitionMode};
pub use self::core::schedule::{generate_schedule, required_slots};
pub use self::core::standings::compute_standings;
pub use self::core::tournament::{Tournament, TournamentEngine, TournamentReport, TournamentSettings};
pub use utils::error::{CupError, Result};
