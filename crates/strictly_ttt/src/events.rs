//! Synchronous publish/subscribe channel between the engine and its collaborators.
//!
//! Every record that crosses the engine boundary is a [`GameEvent`]: facts
//! the engine publishes (cell changes, round results, state and score
//! changes) and intents collaborators raise (cell clicks, UI actions).
//!
//! Publishing notifies subscribers synchronously, in subscription order,
//! and queues the event for the engine's own reactions. The session drains
//! that queue to completion before it accepts the next intent, so a single
//! intent and everything it re-triggers is processed as one unit.

use crate::{Cell, Difficulty, GameStateId, Position, RoundOutcome, Side};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Actions a UI collaborator can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAction {
    /// Start playing from the main menu.
    Play,
    /// Leave the game and return to the main menu.
    Exit,
    /// Play another round after a round completed.
    Restart,
    /// Change the AI difficulty tier.
    SetDifficulty(Difficulty),
}

/// Closed set of records carried by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::EnumDiscriminants)]
#[strum_discriminants(name(EventKind), derive(Hash, strum::Display))]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A cell's content changed.
    CellChanged {
        /// Which cell.
        position: Position,
        /// Its new content.
        cell: Cell,
    },
    /// Board evaluation after a change; `None` means the round is undecided.
    RoundResult {
        /// The decided outcome, if any.
        outcome: Option<RoundOutcome>,
    },
    /// The state machine entered a new state.
    GameStateChanged {
        /// Identity of the new state.
        state: GameStateId,
    },
    /// A score counter changed.
    ScoreChanged {
        /// Which counter.
        side: Side,
        /// Its new total.
        value: u32,
    },
    /// The difficulty setting changed.
    DifficultyChanged {
        /// The new tier.
        difficulty: Difficulty,
    },
    /// The human clicked a cell.
    CellClickIntent {
        /// Raw index as reported by the input collaborator.
        index: i64,
    },
    /// The human triggered a UI action.
    UiActionIntent {
        /// The requested action.
        action: UiAction,
    },
}

impl GameEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        EventKind::from(self)
    }
}

/// Receiver of published events.
///
/// Implementations must not assume they can publish back into the bus; the
/// engine's own reactions happen after all subscribers have been notified.
pub trait Subscriber {
    /// Handles one published event.
    fn notify(&mut self, event: &GameEvent);
}

impl<F> Subscriber for F
where
    F: FnMut(&GameEvent),
{
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// The publish/subscribe channel.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Box<dyn Subscriber>)>,
    pending: VecDeque<GameEvent>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber, returning a handle for [`EventBus::unsubscribe`].
    #[instrument(skip(self, subscriber))]
    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        debug!(?id, total = self.subscribers.len(), "Subscriber registered");
        id
    }

    /// Removes a subscriber. Returns `false` if the handle was unknown.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Notifies every subscriber, then queues the event for the engine.
    #[instrument(skip(self), fields(kind = %event.kind()))]
    pub fn publish(&mut self, event: GameEvent) {
        trace!(?event, "Publishing");
        for (_, subscriber) in &mut self.subscribers {
            subscriber.notify(&event);
        }
        self.pending.push_back(event);
    }

    /// Takes the oldest event still awaiting the engine's reaction.
    pub fn next_pending(&mut self) -> Option<GameEvent> {
        self.pending.pop_front()
    }

    /// Checks if events are awaiting the engine's reaction.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Recording subscriber that can be cloned and inspected after the fact.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Returns the recorded events of one kind.
    pub fn of_kind(&self, kind: EventKind) -> Vec<GameEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Checks if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Subscriber for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
