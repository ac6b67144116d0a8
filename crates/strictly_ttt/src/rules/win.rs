//! Win detection logic for tic-tac-toe.

use crate::{Cell, Mark, Position};
use tracing::instrument;

/// Three positions that win when they hold the same mark.
pub type WinLine = [Position; 3];

/// The fixed win-line table.
///
/// Table order matters: it is the tie-break for win detection and the
/// iteration order of the block-longest heuristic.
pub const WIN_LINES: [WinLine; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
];

/// Returns the first completed line in table order and the mark owning it.
#[instrument(skip(cells))]
pub fn completed_line(cells: &[Cell; 9]) -> Option<(WinLine, Mark)> {
    WIN_LINES.into_iter().find_map(|line @ [a, b, c]| {
        let sq = cells[a.to_index()];
        match sq {
            Cell::Marked(mark) if sq == cells[b.to_index()] && sq == cells[c.to_index()] => {
                Some((line, mark))
            }
            _ => None,
        }
    })
}
