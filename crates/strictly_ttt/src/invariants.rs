//! First-class board invariants.
//!
//! Invariants are logical properties that must hold after every move the
//! session applies. They are checked in debug builds and can be tested
//! independently.

use crate::rules::WIN_LINES;
use crate::{Board, Cell, Mark};
use tracing::{instrument, warn};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: X opens, so X count minus O count is 0 or 1.
pub struct MarkBalanceInvariant;

impl Invariant<Board> for MarkBalanceInvariant {
    fn holds(board: &Board) -> bool {
        let x = board.count(Mark::X);
        let o = board.count(Mark::O);
        x == o || x == o + 1
    }

    fn description() -> &'static str {
        "X opens every round, so X leads O by at most one mark"
    }
}

/// Invariant: at most one mark owns a completed line.
pub struct SingleWinnerInvariant;

impl Invariant<Board> for SingleWinnerInvariant {
    fn holds(board: &Board) -> bool {
        let cells = board.cells();
        let owns_line = |mark: Mark| {
            WIN_LINES
                .iter()
                .any(|line| line.iter().all(|p| cells[p.to_index()] == Cell::Marked(mark)))
        };
        !(owns_line(Mark::X) && owns_line(Mark::O))
    }

    fn description() -> &'static str {
        "Only one mark can complete a line"
    }
}

/// All invariants the session checks after a move.
pub type BoardInvariants = (MarkBalanceInvariant, SingleWinnerInvariant);

/// Asserts that all board invariants hold (panic on violation in debug builds).
#[instrument(skip(board))]
pub fn assert_invariants(board: &Board) {
    if let Err(violations) = BoardInvariants::check_all(board) {
        for v in &violations {
            warn!(description = %v.description, "Board invariant violated");
        }
        debug_assert!(violations.is_empty(), "Board invariants violated: {violations:?}");
    }
}
