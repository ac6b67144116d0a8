//! Sign alternation between rounds.

use crate::{Mark, RoundResult};
use tracing::instrument;

/// Picks the human's mark for the next round.
///
/// A win keeps (or takes) `X` for the winner. A dead heat flips the sign
/// relative to who won the round before it; with no earlier win on record
/// the human opens. With no result on record at all (first round) the
/// human opens too.
#[instrument]
pub fn next_player_sign(previous: Option<RoundResult>, current: Option<RoundResult>) -> Mark {
    match (previous, current) {
        (_, Some(RoundResult::PlayerWin)) => Mark::X,
        (_, Some(RoundResult::EnemyWin)) => Mark::O,
        (Some(RoundResult::PlayerWin), Some(RoundResult::DeadHeat)) => Mark::O,
        (Some(RoundResult::EnemyWin), Some(RoundResult::DeadHeat)) => Mark::X,
        (Some(RoundResult::DeadHeat) | None, Some(RoundResult::DeadHeat)) => Mark::X,
        (_, None) => Mark::X,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_round_opens_with_player() {
        assert_eq!(next_player_sign(None, None), Mark::X);
    }

    #[test]
    fn test_dead_heat_without_history() {
        assert_eq!(next_player_sign(None, Some(RoundResult::DeadHeat)), Mark::X);
    }

    #[test]
    fn test_win_ignores_previous() {
        for previous in [
            None,
            Some(RoundResult::PlayerWin),
            Some(RoundResult::EnemyWin),
            Some(RoundResult::DeadHeat),
        ] {
            assert_eq!(next_player_sign(previous, Some(RoundResult::PlayerWin)), Mark::X);
            assert_eq!(next_player_sign(previous, Some(RoundResult::EnemyWin)), Mark::O);
        }
    }

    #[test]
    fn test_dead_heat_flips_against_previous_winner() {
        assert_eq!(
            next_player_sign(Some(RoundResult::PlayerWin), Some(RoundResult::DeadHeat)),
            Mark::O
        );
        assert_eq!(
            next_player_sign(Some(RoundResult::EnemyWin), Some(RoundResult::DeadHeat)),
            Mark::X
        );
        assert_eq!(
            next_player_sign(Some(RoundResult::DeadHeat), Some(RoundResult::DeadHeat)),
            Mark::X
        );
    }
}
