//! Draw detection logic for tic-tac-toe.

use crate::{Cell, Position};
use tracing::instrument;

/// Checks if every cell holds a mark.
///
/// A full board with no completed line is a dead heat.
#[instrument(skip(cells))]
pub fn is_full(cells: &[Cell; 9]) -> bool {
    cells.iter().all(|c| !c.is_empty())
}

/// Returns the empty positions in index order.
#[instrument(skip(cells))]
pub fn empty_cells(cells: &[Cell; 9]) -> Vec<Position> {
    Position::ALL
        .into_iter()
        .filter(|pos| cells[pos.to_index()].is_empty())
        .collect()
}
