//! Board model: the 9-cell grid, round bookkeeping and win/draw evaluation.

use crate::rules::{completed_line, empty_cells, is_full, next_player_sign};
use crate::{
    Cell, EventBus, GameEvent, IndexError, Mark, Position, RoundOutcome, RoundResult, Side,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// What a write did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The cell already held that value; nothing was published.
    Unchanged,
    /// The cell changed and the board was re-evaluated.
    Changed {
        /// The decided outcome, `None` while the round is open.
        outcome: Option<RoundOutcome>,
    },
}

/// The 3x3 grid plus the human's sign and the last two round results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
    /// Mark held by the human this round.
    player_sign: Mark,
    /// Result of the most recent decided round.
    round_result: Option<RoundResult>,
    /// Result of the round before that.
    previous_round_result: Option<RoundResult>,
}

impl Board {
    /// Creates an empty board with the human holding `X`.
    #[instrument]
    pub fn new() -> Self {
        Self::with_player_sign(Mark::X)
    }

    /// Creates an empty board with the human holding `sign`.
    #[instrument]
    pub fn with_player_sign(sign: Mark) -> Self {
        Self {
            cells: [Cell::Empty; 9],
            player_sign: sign,
            round_result: None,
            previous_round_result: None,
        }
    }

    /// Reads the cell at a raw index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `index` is outside `0..=8`.
    #[instrument(skip(self))]
    pub fn get_cell(&self, index: i64) -> Result<Cell, IndexError> {
        let pos = Position::try_from(index)?;
        Ok(self.cell(pos))
    }

    /// Reads the cell at a position.
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Writes a cell at a raw index.
    ///
    /// See [`Board::place`] for the publishing rules.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `index` is outside `0..=8`. Nothing is
    /// published in that case.
    #[instrument(skip(self, bus))]
    pub fn set_cell(
        &mut self,
        index: i64,
        cell: impl Into<Cell> + std::fmt::Debug,
        bus: &mut EventBus,
    ) -> Result<ChangeOutcome, IndexError> {
        let pos = Position::try_from(index)?;
        Ok(self.place(pos, cell.into(), bus))
    }

    /// Writes a cell at a position.
    ///
    /// Writing the value a cell already holds is a no-op that publishes
    /// nothing. Otherwise publishes `CellChanged`, evaluates the board and
    /// publishes `RoundResult` (with `None` while undecided).
    #[instrument(skip(self, bus))]
    pub fn place(&mut self, pos: Position, cell: Cell, bus: &mut EventBus) -> ChangeOutcome {
        let slot = &mut self.cells[pos.to_index()];
        if *slot == cell {
            debug!(%pos, ?cell, "Cell already holds value");
            return ChangeOutcome::Unchanged;
        }
        *slot = cell;
        debug!(%pos, ?cell, "Cell changed");
        bus.publish(GameEvent::CellChanged {
            position: pos,
            cell,
        });

        let outcome = self.evaluate();
        bus.publish(GameEvent::RoundResult {
            outcome: outcome.clone(),
        });
        ChangeOutcome::Changed { outcome }
    }

    /// Clears the grid for a new round and picks the human's sign.
    ///
    /// Publishes one `CellChanged` per cell, all nine of them, even for
    /// cells that were already empty.
    #[instrument(skip(self, bus))]
    pub fn prepare_round(&mut self, bus: &mut EventBus) {
        self.player_sign = next_player_sign(self.previous_round_result, self.round_result);
        info!(
            player_sign = %self.player_sign,
            previous = ?self.previous_round_result,
            current = ?self.round_result,
            "Round prepared"
        );
        for pos in Position::ALL {
            self.cells[pos.to_index()] = Cell::Empty;
            bus.publish(GameEvent::CellChanged {
                position: pos,
                cell: Cell::Empty,
            });
        }
    }

    /// Evaluates the grid.
    ///
    /// The first completed line in table order wins. A full grid with no
    /// line is a dead heat covering all nine cells. Anything else is `None`.
    #[instrument(skip(self))]
    pub fn evaluate(&self) -> Option<RoundOutcome> {
        if let Some((line, mark)) = completed_line(&self.cells) {
            let result = match self.side_of(mark) {
                Side::Player => RoundResult::PlayerWin,
                Side::Enemy => RoundResult::EnemyWin,
            };
            return Some(RoundOutcome::new(line.to_vec(), Some(mark), result));
        }
        if is_full(&self.cells) {
            return Some(RoundOutcome::dead_heat());
        }
        None
    }

    /// Stores a decided result; the stored one slides into "previous".
    #[instrument(skip(self))]
    pub fn record_result(&mut self, result: RoundResult) {
        self.previous_round_result = self.round_result.replace(result);
    }

    /// Returns the side holding `mark` this round.
    pub fn side_of(&self, mark: Mark) -> Side {
        if mark == self.player_sign {
            Side::Player
        } else {
            Side::Enemy
        }
    }

    /// Returns the mark held by `side` this round.
    pub fn sign_of(&self, side: Side) -> Mark {
        match side {
            Side::Player => self.player_sign,
            Side::Enemy => self.player_sign.opponent(),
        }
    }

    /// Returns the human's mark.
    pub fn player_sign(&self) -> Mark {
        self.player_sign
    }

    /// Returns the AI's mark.
    pub fn enemy_sign(&self) -> Mark {
        self.player_sign.opponent()
    }

    /// Returns the side that opens this round (the one holding `X`).
    pub fn opening_side(&self) -> Side {
        self.side_of(Mark::X)
    }

    /// Result of the most recent decided round.
    pub fn round_result(&self) -> Option<RoundResult> {
        self.round_result
    }

    /// Result of the round before the most recent one.
    pub fn previous_round_result(&self) -> Option<RoundResult> {
        self.previous_round_result
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the empty positions in index order.
    pub fn empty_positions(&self) -> Vec<Position> {
        empty_cells(&self.cells)
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| c.mark() == Some(mark)).count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their index so a player can type it back.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => pos.to_string(),
                    Cell::Marked(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
