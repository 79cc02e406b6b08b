use clap::{Parser, ValueEnum};
use drive_score::ScoringConfig;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "drive-sim",
    about = "Score a simulated or recorded drive and print notifications as JSON lines",
    version
)]
pub struct Cli {
    /// Scoring configuration file (TOML, JSON or YAML); DRIVESCORE_* variables override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Threshold preset the file and environment are layered on
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    pub preset: Preset,

    /// Replay snapshots from a JSON-lines file instead of the built-in scenario
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write every ingested snapshot to a JSON-lines file
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Length of the built-in scenario in seconds
    #[arg(long, default_value_t = 300.0)]
    pub duration: f64,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: Level,

    /// Print Prometheus metrics after the trip summary
    #[arg(long)]
    pub print_metrics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Default,
    Strict,
    Lenient,
}

impl Preset {
    pub fn config(self) -> ScoringConfig {
        match self {
            Self::Default => ScoringConfig::default(),
            Self::Strict => ScoringConfig::strict(),
            Self::Lenient => ScoringConfig::lenient(),
        }
    }
}
