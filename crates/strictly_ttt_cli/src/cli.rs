//! Command-line interface for strictly_ttt.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use strictly_ttt::Difficulty;

/// Strictly TTT - tic-tac-toe against a tiered AI, driven from stdin
#[derive(Parser, Debug)]
#[command(name = "strictly_ttt")]
#[command(about = "Play tic-tac-toe against a tiered AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to an engine config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial AI difficulty (easy, medium, hard); overrides the config file
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Fixed RNG seed for reproducible AI moves; overrides the config file
    #[arg(long)]
    pub seed: Option<u64>,

    /// How published events are written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output formats for the event stream.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines plus the board grid
    Text,
    /// One JSON object per published event
    Json,
}
