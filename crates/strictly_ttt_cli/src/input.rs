//! Parsing of typed stdin lines into engine intents.

use anyhow::{Result, bail};
use std::str::FromStr;
use strictly_ttt::{Difficulty, UiAction};
use tracing::instrument;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Click the cell at a raw index, passed through unchecked.
    Click(i64),
    /// Raise a UI action.
    Action(UiAction),
    /// Move to the next difficulty tier.
    CycleDifficulty,
    /// Print the board.
    Show,
    /// Print the command list.
    Help,
    /// Leave the program.
    Quit,
}

/// Command list shown by `help`.
pub const HELP: &str = "\
commands:
  0-8                  place your mark on that cell
  play                 start playing from the main menu
  restart              play another round after one ends
  exit                 leave the game, back to the main menu
  difficulty [tier]    set easy/medium/hard, or cycle without a tier
  board                show the board
  help                 show this list
  quit                 leave the program";

/// Parses one input line.
///
/// # Errors
///
/// Fails on empty input, unknown words and unknown tiers.
#[instrument]
pub fn parse_command(line: &str) -> Result<Command> {
    let lowered = line.trim().to_lowercase();
    let mut words = lowered.split_whitespace();
    let Some(head) = words.next() else {
        bail!("empty input, type 'help' for commands");
    };

    if let Ok(index) = head.parse::<i64>() {
        return Ok(Command::Click(index));
    }

    let command = match head {
        "play" | "p" => Command::Action(UiAction::Play),
        "restart" | "again" | "r" => Command::Action(UiAction::Restart),
        "exit" | "e" => Command::Action(UiAction::Exit),
        "difficulty" | "d" => match words.next() {
            Some(tier) => match Difficulty::from_str(tier) {
                Ok(difficulty) => Command::Action(UiAction::SetDifficulty(difficulty)),
                Err(_) => bail!("unknown difficulty '{tier}', expected easy, medium or hard"),
            },
            None => Command::CycleDifficulty,
        },
        "board" | "b" => Command::Show,
        "help" | "?" | "h" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}', type 'help' for commands"),
    };
    Ok(command)
}
