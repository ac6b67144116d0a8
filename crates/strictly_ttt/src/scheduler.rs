//! Deferred steps and the schedulers that run them.
//!
//! The engine never sleeps. Pacing pauses (before the AI moves, before a
//! replayed round starts) are requested from a [`Scheduler`], which hands
//! the step back later, together with its [`TaskHandle`], through
//! `Session::run_deferred`. Running a step late behaves exactly like running
//! it at once; a handle the session no longer waits for is dropped.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

/// A core step that may run after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deferred {
    /// Ask the move selector for the AI's move and apply it.
    EnemyMove,
    /// Start the next round after a play-again request.
    StartRound,
}

/// Identifies a scheduled step so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Source of delayed callbacks.
pub trait Scheduler {
    /// Requests that `task` be handed back after `delay`.
    fn schedule(&mut self, task: Deferred, delay: Duration) -> TaskHandle;

    /// Withdraws a scheduled task. Unknown or finished handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);

    /// Returns a task that must run inline, before the current intent
    /// finishes processing.
    fn take_due(&mut self) -> Option<(TaskHandle, Deferred)> {
        None
    }
}

/// Shared bookkeeping for schedulers that keep tasks in a local queue.
#[derive(Debug, Default)]
struct LocalQueue {
    tasks: VecDeque<(TaskHandle, Deferred)>,
    next_id: u64,
}

impl LocalQueue {
    fn push(&mut self, task: Deferred) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push_back((handle, task));
        handle
    }

    fn remove(&mut self, handle: TaskHandle) {
        self.tasks.retain(|(h, _)| *h != handle);
    }

    fn pop(&mut self) -> Option<(TaskHandle, Deferred)> {
        self.tasks.pop_front()
    }
}

/// Ignores delays: every task runs inline as soon as it is scheduled.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    queue: LocalQueue,
}

impl ImmediateScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ImmediateScheduler {
    #[instrument(skip(self))]
    fn schedule(&mut self, task: Deferred, delay: Duration) -> TaskHandle {
        self.queue.push(task)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.queue.remove(handle);
    }

    fn take_due(&mut self) -> Option<(TaskHandle, Deferred)> {
        self.queue.pop()
    }
}

/// Holds tasks until the owner takes them; never runs anything by itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: LocalQueue,
}

impl ManualScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks still waiting, oldest first.
    pub fn pending(&self) -> Vec<Deferred> {
        self.queue.tasks.iter().map(|(_, task)| *task).collect()
    }

    /// Removes and returns the oldest waiting task with its handle.
    pub fn pop(&mut self) -> Option<(TaskHandle, Deferred)> {
        self.queue.pop()
    }
}

impl Scheduler for ManualScheduler {
    #[instrument(skip(self))]
    fn schedule(&mut self, task: Deferred, delay: Duration) -> TaskHandle {
        self.queue.push(task)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.queue.remove(handle);
    }
}

/// Timer-backed scheduler for use inside a tokio runtime.
///
/// Each task sleeps on its own spawned future and is then delivered, with
/// its handle, over the channel returned by [`TokioScheduler::new`]. The
/// receiver side passes both to `Session::run_deferred`. A timer that fires
/// just before `cancel` may still deliver; the handle lets the session spot it.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<(TaskHandle, Deferred)>,
    timers: HashMap<TaskHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiver its tasks arrive on.
    #[instrument]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(TaskHandle, Deferred)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            timers: HashMap::new(),
            next_id: 0,
        };
        (scheduler, rx)
    }
}

impl Scheduler for TokioScheduler {
    #[instrument(skip(self))]
    fn schedule(&mut self, task: Deferred, delay: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        // Finished timers are dropped here so the map stays small.
        self.timers.retain(|_, timer| !timer.is_finished());

        let tx = self.tx.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send((handle, task)).is_err() {
                trace!(?task, "Receiver gone, dropping deferred task");
            }
        });
        self.timers.insert(handle, timer);
        handle
    }

    #[instrument(skip(self))]
    fn cancel(&mut self, handle: TaskHandle) {
        if let Some(timer) = self.timers.remove(&handle) {
            debug!(?handle, "Cancelling deferred task");
            timer.abort();
        }
    }
}
