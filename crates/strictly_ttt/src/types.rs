//! Core domain types for a round of tic-tac-toe.

use crate::Position;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A mark placed in a cell.
///
/// `X` always opens a round. Which side holds `X` is decided per round by
/// the sign-alternation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Mark {
    /// The opening mark.
    X,
    /// The answering mark.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// Cell holds a mark.
    Marked(Mark),
}

impl Cell {
    /// Returns the mark, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }

    /// Checks if the cell is empty.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        Cell::Marked(mark)
    }
}

/// One of the two participants, seen from the human's side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The human player.
    Player,
    /// The AI opponent.
    Enemy,
}

/// How a round ended, from the human's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RoundResult {
    /// The human completed a line.
    PlayerWin,
    /// The AI completed a line.
    EnemyWin,
    /// Board filled without a completed line.
    DeadHeat,
}

impl RoundResult {
    /// Returns the side credited with the round, `None` for a dead heat.
    pub fn winner(self) -> Option<Side> {
        match self {
            RoundResult::PlayerWin => Some(Side::Player),
            RoundResult::EnemyWin => Some(Side::Enemy),
            RoundResult::DeadHeat => None,
        }
    }
}

/// A decided round: the cells to highlight, the winning mark and the result.
///
/// For a win `sequence` is the completed line and `mark` is its owner. For a
/// dead heat `sequence` covers all nine cells and `mark` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct RoundOutcome {
    /// Cells that make up the outcome.
    sequence: Vec<Position>,
    /// Mark that completed the line.
    mark: Option<Mark>,
    /// Result relative to the human's sign.
    result: RoundResult,
}

impl RoundOutcome {
    /// Builds the outcome for a full board with no completed line.
    pub fn dead_heat() -> Self {
        Self::new(Position::ALL.to_vec(), None, RoundResult::DeadHeat)
    }
}
