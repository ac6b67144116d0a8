//! Event-stream rendering to stdout.

use crate::cli::OutputFormat;
use strictly_ttt::{GameEvent, GameStateId, Side, Subscriber};
use tracing::warn;

/// Subscriber that writes every published event to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    /// Creates a renderer for the given format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Subscriber for Renderer {
    fn notify(&mut self, event: &GameEvent) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode event"),
            },
            OutputFormat::Text => {
                if let Some(line) = describe(event) {
                    println!("{line}");
                }
            }
        }
    }
}

/// Text line for events a player cares about; cell-level noise is skipped.
fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::GameStateChanged { state } => match state {
            GameStateId::MainMenu => Some("== main menu == (type 'play')".to_string()),
            GameStateId::PlayerTurn => Some("Your move.".to_string()),
            GameStateId::EnemyTurn => Some("AI is thinking...".to_string()),
            GameStateId::RoundComplete => Some("Round over. Type 'restart' or 'exit'.".to_string()),
            _ => None,
        },
        GameEvent::RoundResult {
            outcome: Some(outcome),
        } => {
            let cells: Vec<String> = outcome
                .sequence()
                .iter()
                .map(|p| p.to_index().to_string())
                .collect();
            Some(format!(
                "Result: {} (cells {})",
                outcome.result(),
                cells.join(",")
            ))
        }
        GameEvent::ScoreChanged { side, value } => Some(match side {
            Side::Player => format!("Your score: {value}"),
            Side::Enemy => format!("AI score: {value}"),
        }),
        GameEvent::DifficultyChanged { difficulty } => {
            Some(format!("Difficulty: {}", difficulty.label()))
        }
        GameEvent::CellChanged { .. }
        | GameEvent::RoundResult { outcome: None }
        | GameEvent::CellClickIntent { .. }
        | GameEvent::UiActionIntent { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_ttt::{Difficulty, RoundOutcome};

    #[test]
    fn test_describe_dead_heat() {
        let event = GameEvent::RoundResult {
            outcome: Some(RoundOutcome::dead_heat()),
        };
        assert_eq!(
            describe(&event).unwrap(),
            "Result: DeadHeat (cells 0,1,2,3,4,5,6,7,8)"
        );
    }

    #[test]
    fn test_describe_skips_cell_noise() {
        let event = GameEvent::CellClickIntent { index: 3 };
        assert!(describe(&event).is_none());
        let event = GameEvent::DifficultyChanged {
            difficulty: Difficulty::Medium,
        };
        assert_eq!(describe(&event).unwrap(), "Difficulty: Medium");
    }
}
