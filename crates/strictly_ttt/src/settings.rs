//! Session settings: user-configurable preferences read by the engine.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// AI difficulty tier.
///
/// Higher tiers apply the block-longest heuristic more often before
/// falling back to a uniform random pick.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Uniform random empty cell.
    #[default]
    Easy,
    /// Half the time blocks the human's longest line.
    Medium,
    /// Blocks first, then rolls again as Medium.
    Hard,
}

impl Difficulty {
    /// Returns the display label for this tier.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Cycles Easy -> Medium -> Hard -> Easy.
    #[instrument]
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }
}

/// User-configurable settings for a session.
///
/// Settings are not part of the board; the state machine reads the
/// difficulty when it asks for an AI move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Tier used for AI moves.
    pub difficulty: Difficulty,
}

impl Settings {
    /// Creates a new `Settings` with the given tier.
    #[instrument]
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Sets the tier, returning `true` only if it actually changed.
    #[instrument(skip(self), fields(from = %self.difficulty))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        let changed = self.difficulty != difficulty;
        self.difficulty = difficulty;
        changed
    }
}
