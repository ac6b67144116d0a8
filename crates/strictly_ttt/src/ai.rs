//! Move selection for the AI side.
//!
//! Selection is a pure function of the grid, the human's sign, the tier
//! and a random source. Randomness is injected so callers can seed it.

use crate::rules::{WIN_LINES, WinLine, empty_cells};
use crate::{Cell, Difficulty, Mark, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Chance that Medium and Hard try the block-longest heuristic on a roll.
pub const HEURISTIC_CHANCE: f64 = 0.5;

/// Picks the AI's next cell.
///
/// Returns `None` only when no empty cell exists.
#[instrument(skip(cells, rng))]
pub fn select_move<R: Rng + ?Sized>(
    cells: &[Cell; 9],
    player_sign: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    let choice = match difficulty {
        Difficulty::Easy => pick_easy(cells, rng),
        Difficulty::Medium => pick_medium(cells, player_sign, rng),
        Difficulty::Hard => pick_hard(cells, player_sign, rng),
    };
    debug!(?choice, "AI chose position");
    choice
}

/// Uniform pick among the empty cells.
fn pick_easy<R: Rng + ?Sized>(cells: &[Cell; 9], rng: &mut R) -> Option<Position> {
    empty_cells(cells).choose(rng).copied()
}

fn pick_medium<R: Rng + ?Sized>(
    cells: &[Cell; 9],
    player_sign: Mark,
    rng: &mut R,
) -> Option<Position> {
    if rng.gen_bool(HEURISTIC_CHANCE)
        && let Some(pos) = block_longest(cells, player_sign)
    {
        return Some(pos);
    }
    pick_easy(cells, rng)
}

/// Like Medium, but with an extra block-longest roll in front.
fn pick_hard<R: Rng + ?Sized>(
    cells: &[Cell; 9],
    player_sign: Mark,
    rng: &mut R,
) -> Option<Position> {
    if rng.gen_bool(HEURISTIC_CHANCE)
        && let Some(pos) = block_longest(cells, player_sign)
    {
        return Some(pos);
    }
    pick_medium(cells, player_sign, rng)
}

/// Finds an empty cell in the human's most-filled line.
///
/// Only lines holding at least one human mark and no AI mark count. The
/// candidates are stable-sorted by filled count, ascending, and the last
/// one is taken: among equally filled lines the one latest in table order
/// wins. The first empty cell of that line, in line order, is returned.
///
/// Returns `None` when no line qualifies or the chosen line has no empty
/// cell left.
#[instrument(skip(cells))]
pub fn block_longest(cells: &[Cell; 9], player_sign: Mark) -> Option<Position> {
    let mut candidates: Vec<(WinLine, usize)> = WIN_LINES
        .into_iter()
        .filter_map(|line| player_only_fill(cells, player_sign, line).map(|n| (line, n)))
        .collect();
    candidates.sort_by_key(|(_, filled)| *filled);

    let (line, filled) = candidates.last()?;
    debug!(?line, filled, "Longest player line");
    line.iter().copied().find(|pos| cells[pos.to_index()].is_empty())
}

/// Counts filled cells of `line` if every filled one is the human's.
fn player_only_fill(cells: &[Cell; 9], player_sign: Mark, line: WinLine) -> Option<usize> {
    let mut filled = 0;
    for pos in line {
        match cells[pos.to_index()] {
            Cell::Empty => {}
            Cell::Marked(mark) if mark == player_sign => filled += 1,
            Cell::Marked(_) => return None,
        }
    }
    (filled > 0).then_some(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells_with(marks: &[(usize, Mark)]) -> [Cell; 9] {
        let mut cells = [Cell::Empty; 9];
        for (idx, mark) in marks {
            cells[*idx] = Cell::Marked(*mark);
        }
        cells
    }

    #[test]
    fn test_player_only_fill_rejects_mixed_line() {
        let cells = cells_with(&[(0, Mark::X), (1, Mark::O)]);
        assert_eq!(player_only_fill(&cells, Mark::X, WIN_LINES[0]), None);
    }

    #[test]
    fn test_player_only_fill_rejects_empty_line() {
        let cells = [Cell::Empty; 9];
        assert_eq!(player_only_fill(&cells, Mark::X, WIN_LINES[0]), None);
    }

    #[test]
    fn test_player_only_fill_counts_player_marks() {
        let cells = cells_with(&[(0, Mark::X), (2, Mark::X)]);
        assert_eq!(player_only_fill(&cells, Mark::X, WIN_LINES[0]), Some(2));
    }
}
