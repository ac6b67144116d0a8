//! Engine configuration loaded from TOML.

use crate::{ConfigError, Difficulty};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunables for a session.
///
/// Every key is optional in the file; missing keys take the defaults below.
///
/// ```toml
/// difficulty = "medium"
/// enemy_move_delay_ms = 500
/// restart_delay_ms = 500
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial AI tier.
    #[serde(default)]
    difficulty: Difficulty,

    /// Pause before the AI moves, in milliseconds.
    #[serde(default = "default_delay_ms")]
    enemy_move_delay_ms: u64,

    /// Pause between a play-again request and the new round, in milliseconds.
    #[serde(default = "default_delay_ms")]
    restart_delay_ms: u64,

    /// Fixed RNG seed for reproducible AI choices.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_delay_ms() -> u64 {
    500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            enemy_move_delay_ms: default_delay_ms(),
            restart_delay_ms: default_delay_ms(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        info!(difficulty = %config.difficulty, seed = ?config.seed, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid for this schema.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides the initial tier.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Overrides the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets both pacing delays, in milliseconds.
    pub fn with_delays_ms(mut self, enemy_move: u64, restart: u64) -> Self {
        self.enemy_move_delay_ms = enemy_move;
        self.restart_delay_ms = restart;
        self
    }

    /// Pause before the AI moves.
    pub fn enemy_move_delay(&self) -> Duration {
        Duration::from_millis(self.enemy_move_delay_ms)
    }

    /// Pause before a replayed round starts.
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}
