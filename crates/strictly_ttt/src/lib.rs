//! Tic-tac-toe engine core: one human against an AI opponent.
//!
//! The engine owns the board, the score, the difficulty setting and the
//! game-flow state machine. Collaborators (renderers, input handlers)
//! never touch them directly: they raise intents on a [`Session`] and
//! observe the [`GameEvent`]s it publishes.
//!
//! # Example
//!
//! ```
//! use strictly_ttt::{EngineConfig, EventLog, GameStateId, ImmediateScheduler, Session, UiAction};
//!
//! let mut session = Session::new(EngineConfig::default().with_seed(1), ImmediateScheduler::new());
//! let log = EventLog::new();
//! session.subscribe(log.clone());
//!
//! session.start();
//! session.action(UiAction::Play);
//! assert_eq!(session.state(), GameStateId::PlayerTurn);
//!
//! session.click(4).unwrap();
//! assert_eq!(session.state(), GameStateId::PlayerTurn);
//! assert!(!log.is_empty());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ai;
mod board;
mod config;
mod error;
mod events;
pub mod invariants;
mod machine;
mod position;
pub mod rules;
mod scheduler;
mod score;
mod session;
mod settings;
mod types;

pub use ai::{HEURISTIC_CHANCE, block_longest, select_move};
pub use board::{Board, ChangeOutcome};
pub use config::EngineConfig;
pub use error::{ConfigError, IndexError};
pub use events::{EventBus, EventKind, EventLog, GameEvent, Subscriber, SubscriberId, UiAction};
pub use invariants::{Invariant, InvariantSet, InvariantViolation};
pub use machine::{GameStateId, StateMachine, Transition, Trigger, transition};
pub use position::{CELL_COUNT, Position};
pub use scheduler::{
    Deferred, ImmediateScheduler, ManualScheduler, Scheduler, TaskHandle, TokioScheduler,
};
pub use score::Score;
pub use session::{Session, SessionSnapshot};
pub use settings::{Difficulty, Settings};
pub use types::{Cell, Mark, RoundOutcome, RoundResult, Side};
