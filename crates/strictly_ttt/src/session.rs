//! Session coordinator: owns the board, score, settings and state machine.
//!
//! A session is the single context every intent goes through. Collaborators
//! raise intents with [`Session::raise`] and watch the published events
//! through subscribers; the session processes one intent and everything it
//! re-triggers to completion before returning.

use crate::invariants::assert_invariants;
use crate::machine::{StateMachine, Trigger};
use crate::scheduler::{Deferred, ManualScheduler, Scheduler, TaskHandle};
use crate::{
    Board, Cell, EngineConfig, EventBus, GameEvent, GameStateId, IndexError, Mark, Position,
    RoundOutcome, RoundResult, Score, Settings, Subscriber, SubscriberId, UiAction, ai,
};
use derive_getters::Getters;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Serializable view of a session for collaborators that render from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionSnapshot {
    /// Current state.
    state: GameStateId,
    /// Cells in row-major order.
    cells: [Cell; 9],
    /// Human's mark this round.
    player_sign: Mark,
    /// Current AI tier.
    difficulty: crate::Difficulty,
    /// Session score.
    score: Score,
    /// Outcome of the round just decided, if the round is over.
    last_outcome: Option<RoundOutcome>,
}

/// One game session.
#[derive(Debug)]
pub struct Session<S: Scheduler> {
    board: Board,
    score: Score,
    settings: Settings,
    machine: StateMachine,
    bus: EventBus,
    scheduler: S,
    rng: ChaCha8Rng,
    config: EngineConfig,
    pending_enemy: Option<TaskHandle>,
    pending_restart: Option<TaskHandle>,
    last_outcome: Option<RoundOutcome>,
}

impl<S: Scheduler> Session<S> {
    /// Creates a session in [`GameStateId::None`].
    ///
    /// The AI's random source is seeded from `config.seed` when set.
    #[instrument(skip(scheduler))]
    pub fn new(config: EngineConfig, scheduler: S) -> Self {
        let rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(*seed),
            None => ChaCha8Rng::from_entropy(),
        };
        info!(difficulty = %config.difficulty(), "Creating session");
        Self {
            board: Board::new(),
            score: Score::new(),
            settings: Settings::new(*config.difficulty()),
            machine: StateMachine::new(),
            bus: EventBus::new(),
            scheduler,
            rng,
            config,
            pending_enemy: None,
            pending_restart: None,
            last_outcome: None,
        }
    }

    /// Registers a subscriber on the session's bus.
    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) -> SubscriberId {
        self.bus.subscribe(subscriber)
    }

    /// Removes a subscriber from the session's bus.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Moves from `None` to the main menu.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        self.change(Trigger::AppStarted);
        // Entry actions cannot fail; nothing here touches a raw index.
        if let Err(e) = self.process() {
            warn!(error = %e, "Unexpected error while starting");
        }
    }

    /// Raises an intent and processes it to completion.
    ///
    /// The intent is published first, so collaborators see it too.
    /// Anything other than a cell click or a UI action is a fact only the
    /// engine may publish; it is dropped without being published.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] when a cell click honored in `PlayerTurn`
    /// carries an index outside `0..=8`.
    #[instrument(skip(self))]
    pub fn raise(&mut self, intent: GameEvent) -> Result<(), IndexError> {
        if !matches!(
            intent,
            GameEvent::CellClickIntent { .. } | GameEvent::UiActionIntent { .. }
        ) {
            warn!(kind = %intent.kind(), "Collaborators may only raise intents");
            return Ok(());
        }
        self.bus.publish(intent);
        self.process()
    }

    /// Raises a cell click.
    ///
    /// # Errors
    ///
    /// See [`Session::raise`].
    pub fn click(&mut self, index: i64) -> Result<(), IndexError> {
        self.raise(GameEvent::CellClickIntent { index })
    }

    /// Raises a UI action.
    pub fn action(&mut self, action: UiAction) {
        // UI actions never carry a cell index.
        if let Err(e) = self.raise(GameEvent::UiActionIntent { action }) {
            warn!(error = %e, "Unexpected error from UI action");
        }
    }

    /// Runs a step handed back by the scheduler.
    ///
    /// Behaves exactly as if the step had run without delay. Steps that no
    /// longer apply are dropped: a handle that is not the one currently
    /// pending (a timer that fired before it was cancelled), an AI move
    /// outside `EnemyTurn`, or a new round outside `RoundComplete`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the processing it triggers.
    #[instrument(skip(self))]
    pub fn run_deferred(&mut self, handle: TaskHandle, task: Deferred) -> Result<(), IndexError> {
        self.execute(handle, task)?;
        self.process()
    }

    /// Current state identity.
    pub fn state(&self) -> GameStateId {
        self.machine.current()
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The score.
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// The settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The configuration the session was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler, for drivers that hand tasks back.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Outcome of the round just decided; cleared when the next round starts.
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Captures a serializable view of the session.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            cells: *self.board.cells(),
            player_sign: self.board.player_sign(),
            difficulty: self.settings.difficulty,
            score: self.score,
            last_outcome: self.last_outcome.clone(),
        }
    }

    /// Drains queued events, then any scheduler tasks that are due inline.
    fn process(&mut self) -> Result<(), IndexError> {
        loop {
            self.drain_events()?;
            match self.scheduler.take_due() {
                Some((handle, task)) => self.execute(handle, task)?,
                None => return Ok(()),
            }
        }
    }

    fn drain_events(&mut self) -> Result<(), IndexError> {
        while let Some(event) = self.bus.next_pending() {
            self.react(event)?;
        }
        Ok(())
    }

    /// The engine's own reaction to each event kind.
    #[instrument(skip(self), fields(kind = %event.kind()))]
    fn react(&mut self, event: GameEvent) -> Result<(), IndexError> {
        match event {
            GameEvent::CellChanged { .. }
            | GameEvent::GameStateChanged { .. }
            | GameEvent::ScoreChanged { .. }
            | GameEvent::DifficultyChanged { .. } => {}
            GameEvent::RoundResult {
                outcome: Some(outcome),
            } => self.on_round_decided(outcome),
            GameEvent::RoundResult { outcome: None } => {
                if self.state() == GameStateId::PlayerTurn {
                    self.change(Trigger::HumanMoved);
                }
            }
            GameEvent::CellClickIntent { index } => self.on_cell_click(index)?,
            GameEvent::UiActionIntent { action } => self.on_ui_action(action),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn on_cell_click(&mut self, index: i64) -> Result<(), IndexError> {
        if self.state() != GameStateId::PlayerTurn {
            debug!(state = %self.state(), "Click outside player turn dropped");
            return Ok(());
        }
        let pos = Position::try_from(index).inspect_err(|e| {
            warn!(error = %e, "Click on invalid cell index");
        })?;
        if !self.board.cell(pos).is_empty() {
            debug!(%pos, "Click on occupied cell dropped");
            return Ok(());
        }
        let mark = self.board.player_sign();
        self.board.place(pos, mark.into(), &mut self.bus);
        assert_invariants(&self.board);
        Ok(())
    }

    #[instrument(skip(self))]
    fn on_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::Play => self.change(Trigger::Play),
            UiAction::Exit => self.change(Trigger::Exit),
            UiAction::Restart => {
                if self.state() != GameStateId::RoundComplete {
                    debug!(state = %self.state(), "Restart outside round complete dropped");
                } else if self.pending_restart.is_some() {
                    debug!("Restart already scheduled");
                } else {
                    let delay = self.config.restart_delay();
                    let handle = self.scheduler.schedule(Deferred::StartRound, delay);
                    self.pending_restart = Some(handle);
                }
            }
            UiAction::SetDifficulty(difficulty) => {
                if self.settings.set_difficulty(difficulty) {
                    info!(%difficulty, "Difficulty changed");
                    self.bus.publish(GameEvent::DifficultyChanged { difficulty });
                }
            }
        }
    }

    #[instrument(skip(self))]
    fn on_round_decided(&mut self, outcome: RoundOutcome) {
        if !matches!(self.state(), GameStateId::PlayerTurn | GameStateId::EnemyTurn) {
            debug!(state = %self.state(), "Decided result outside a turn ignored");
            return;
        }
        info!(result = %outcome.result(), line = ?outcome.sequence(), "Round decided");
        self.board.record_result(*outcome.result());
        self.last_outcome = Some(outcome);
        self.change(Trigger::RoundDecided);
    }

    #[instrument(skip(self))]
    fn execute(&mut self, handle: TaskHandle, task: Deferred) -> Result<(), IndexError> {
        let pending = match task {
            Deferred::EnemyMove => &mut self.pending_enemy,
            Deferred::StartRound => &mut self.pending_restart,
        };
        if *pending != Some(handle) {
            debug!(?pending, "Delivery from a withdrawn timer dropped");
            return Ok(());
        }
        *pending = None;

        match task {
            Deferred::EnemyMove => self.play_enemy_turn(),
            Deferred::StartRound => {
                if self.state() == GameStateId::RoundComplete {
                    self.change(Trigger::PlayAgain);
                } else {
                    debug!(state = %self.state(), "Stale round start dropped");
                }
                Ok(())
            }
        }
    }

    #[instrument(skip(self))]
    fn play_enemy_turn(&mut self) -> Result<(), IndexError> {
        if self.state() != GameStateId::EnemyTurn {
            debug!(state = %self.state(), "Stale enemy move dropped");
            return Ok(());
        }
        let choice = ai::select_move(
            self.board.cells(),
            self.board.player_sign(),
            self.settings.difficulty,
            &mut self.rng,
        );
        self.apply_enemy_move(choice)
    }

    /// Places the AI's mark, lets a decided result pre-empt, then hands the
    /// turn back if the round is still open.
    fn apply_enemy_move(&mut self, choice: Option<Position>) -> Result<(), IndexError> {
        if let Some(pos) = choice {
            let mark = self.board.enemy_sign();
            self.board.place(pos, mark.into(), &mut self.bus);
            assert_invariants(&self.board);
            self.drain_events()?;
        }
        if self.state() == GameStateId::EnemyTurn {
            self.change(Trigger::EnemyMoved);
        }
        Ok(())
    }

    /// Fires a trigger and runs exit, entry and any automatic follow-up.
    fn change(&mut self, trigger: Trigger) {
        let Some(transition) = self.machine.fire(trigger) else {
            return;
        };
        self.on_exit(*transition.from());
        let follow_up = self.on_enter(*transition.to());
        self.bus.publish(GameEvent::GameStateChanged {
            state: *transition.to(),
        });
        if let Some(next) = follow_up {
            self.change(next);
        }
    }

    fn on_exit(&mut self, state: GameStateId) {
        match state {
            GameStateId::EnemyTurn => {
                if let Some(handle) = self.pending_enemy.take() {
                    self.scheduler.cancel(handle);
                }
            }
            GameStateId::RoundComplete => {
                if let Some(handle) = self.pending_restart.take() {
                    self.scheduler.cancel(handle);
                }
            }
            GameStateId::None
            | GameStateId::MainMenu
            | GameStateId::EnterGame
            | GameStateId::RoundStarted
            | GameStateId::PlayerTurn
            | GameStateId::LeaveGame => {}
        }
    }

    /// Entry action per state. Returns the automatic follow-up trigger, if any.
    fn on_enter(&mut self, state: GameStateId) -> Option<Trigger> {
        match state {
            GameStateId::None | GameStateId::MainMenu | GameStateId::PlayerTurn => None,
            GameStateId::EnterGame => {
                // A new game forgets earlier rounds; the score carries over.
                self.board = Board::new();
                Some(Trigger::ContextEntered)
            }
            GameStateId::RoundStarted => {
                self.last_outcome = None;
                self.board.prepare_round(&mut self.bus);
                Some(Trigger::RoundPrepared {
                    opening: self.board.opening_side(),
                })
            }
            GameStateId::EnemyTurn => {
                let delay = self.config.enemy_move_delay();
                self.pending_enemy = Some(self.scheduler.schedule(Deferred::EnemyMove, delay));
                None
            }
            GameStateId::RoundComplete => {
                match self.board.round_result() {
                    Some(RoundResult::PlayerWin) => self.score.increment_player(&mut self.bus),
                    Some(RoundResult::EnemyWin) => self.score.increment_enemy(&mut self.bus),
                    Some(RoundResult::DeadHeat) | None => {}
                }
                None
            }
            GameStateId::LeaveGame => Some(Trigger::ContextLeft),
        }
    }
}

impl Session<ManualScheduler> {
    /// Runs the oldest task waiting in the manual scheduler.
    ///
    /// Returns `false` if nothing was waiting.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Session::run_deferred`].
    #[instrument(skip(self))]
    pub fn advance(&mut self) -> Result<bool, IndexError> {
        match self.scheduler.pop() {
            Some((handle, task)) => {
                self.run_deferred(handle, task)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
