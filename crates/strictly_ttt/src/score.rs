//! Win counters for the human and the AI.

use crate::{EventBus, GameEvent, Side};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Session score. Counters only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct Score {
    /// Rounds won by the human.
    player: u32,
    /// Rounds won by the AI.
    enemy: u32,
}

impl Score {
    /// Creates a zeroed score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the human's counter and publishes the new total.
    #[instrument(skip(self, bus))]
    pub fn increment_player(&mut self, bus: &mut EventBus) {
        self.player += 1;
        info!(player = self.player, "Player score");
        bus.publish(GameEvent::ScoreChanged {
            side: Side::Player,
            value: self.player,
        });
    }

    /// Increments the AI's counter and publishes the new total.
    #[instrument(skip(self, bus))]
    pub fn increment_enemy(&mut self, bus: &mut EventBus) {
        self.enemy += 1;
        info!(enemy = self.enemy, "Enemy score");
        bus.publish(GameEvent::ScoreChanged {
            side: Side::Enemy,
            value: self.enemy,
        });
    }

    /// Returns the counter for one side.
    pub fn of(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Enemy => self.enemy,
        }
    }
}
