//! Game-flow state machine.
//!
//! States are a closed enum and every legal move between them is listed in
//! [`transition`], keyed by `(current state, trigger)`. The machine only
//! decides *whether* and *where* to go; entry and exit actions live with the
//! session, which owns the board and the score they act on.
//!
//! ```text
//! None -> MainMenu -> EnterGame -> RoundStarted -> PlayerTurn <-> EnemyTurn
//!            ^                          ^              \          /
//!            |                          |               RoundComplete
//!            +------- LeaveGame <-------+--- (exit) ------/
//! ```

use crate::Side;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Identity of a game state.
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
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum GameStateId {
    /// Before the application started.
    #[default]
    None,
    /// Main menu is showing.
    MainMenu,
    /// Game context is being entered.
    EnterGame,
    /// A round is being prepared.
    RoundStarted,
    /// Waiting for the human's move.
    PlayerTurn,
    /// The AI is about to move.
    EnemyTurn,
    /// The round has been decided.
    RoundComplete,
    /// Game context is being torn down.
    LeaveGame,
}

impl GameStateId {
    /// Checks if the state belongs to the in-game context.
    pub fn is_in_game(self) -> bool {
        matches!(
            self,
            Self::EnterGame
                | Self::RoundStarted
                | Self::PlayerTurn
                | Self::EnemyTurn
                | Self::RoundComplete
        )
    }
}

/// Why the machine should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The application finished starting up.
    AppStarted,
    /// Play was requested from the main menu.
    Play,
    /// The game context is ready.
    ContextEntered,
    /// The board was reset; `opening` holds `X` and moves first.
    RoundPrepared {
        /// Side holding the opening mark.
        opening: Side,
    },
    /// The human made a move that left the round undecided.
    HumanMoved,
    /// The AI finished its turn without deciding the round.
    EnemyMoved,
    /// The board reported a decided result.
    RoundDecided,
    /// Another round was requested.
    PlayAgain,
    /// Leaving the game was requested.
    Exit,
    /// The game context was torn down.
    ContextLeft,
}

/// Looks up the target state for `trigger` in `current`.
///
/// Returns `None` when the trigger has no meaning in that state.
pub fn transition(current: GameStateId, trigger: Trigger) -> Option<GameStateId> {
    use GameStateId as S;
    match (current, trigger) {
        (S::None, Trigger::AppStarted) => Some(S::MainMenu),
        (S::MainMenu, Trigger::Play) => Some(S::EnterGame),
        (S::EnterGame, Trigger::ContextEntered) => Some(S::RoundStarted),
        (S::RoundStarted, Trigger::RoundPrepared { opening: Side::Player }) => Some(S::PlayerTurn),
        (S::RoundStarted, Trigger::RoundPrepared { opening: Side::Enemy }) => Some(S::EnemyTurn),
        (S::PlayerTurn, Trigger::HumanMoved) => Some(S::EnemyTurn),
        (S::EnemyTurn, Trigger::EnemyMoved) => Some(S::PlayerTurn),
        (S::PlayerTurn | S::EnemyTurn, Trigger::RoundDecided) => Some(S::RoundComplete),
        (S::RoundComplete, Trigger::PlayAgain) => Some(S::RoundStarted),
        (state, Trigger::Exit) if state.is_in_game() => Some(S::LeaveGame),
        (S::LeaveGame, Trigger::ContextLeft) => Some(S::MainMenu),
        _ => None,
    }
}

/// A state change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, derive_new::new)]
pub struct Transition {
    /// State left.
    from: GameStateId,
    /// State entered.
    to: GameStateId,
    /// What caused it.
    trigger: Trigger,
}

/// Holds the current state and applies the transition table.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: GameStateId,
}

impl StateMachine {
    /// Creates a machine in [`GameStateId::None`].
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn current(&self) -> GameStateId {
        self.current
    }

    /// Applies `trigger` and returns the transition that happened, if any.
    ///
    /// A trigger that is not in the table, or one that resolves to the
    /// current state, leaves the machine untouched and returns `None`.
    #[instrument(skip(self), fields(current = %self.current))]
    pub fn fire(&mut self, trigger: Trigger) -> Option<Transition> {
        let Some(to) = transition(self.current, trigger) else {
            debug!(?trigger, "Trigger ignored in this state");
            return None;
        };
        if to == self.current {
            debug!(state = %to, "Already in target state");
            return None;
        }
        let from = std::mem::replace(&mut self.current, to);
        info!(%from, %to, ?trigger, "State changed");
        Some(Transition::new(from, to, trigger))
    }
}
