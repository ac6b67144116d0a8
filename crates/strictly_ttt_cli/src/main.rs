//! Strictly TTT - terminal front end
//!
//! Reads commands from stdin, raises them as intents on an engine session and
//! prints the published events. AI pacing runs on tokio timers.

#![warn(missing_docs)]

mod cli;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use input::{Command, HELP, parse_command};
use render::Renderer;
use strictly_ttt::{EngineConfig, GameStateId, Session, TokioScheduler, UiAction};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    run(config, cli.format).await
}

/// Loads the config file, if any, and applies CLI overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    info!(?config, "Configuration resolved");
    Ok(config)
}

/// Main loop: stdin commands and timer deliveries, one at a time.
async fn run(config: EngineConfig, format: OutputFormat) -> Result<()> {
    let (scheduler, mut deferred) = TokioScheduler::new();
    let mut session = Session::new(config, scheduler);
    session.subscribe(Renderer::new(format));
    session.start();
    if format == OutputFormat::Text {
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(&mut session, command, format),
                    Err(e) => eprintln!("{e}"),
                }
            }
            Some((id, task)) = deferred.recv() => {
                if let Err(e) = session.run_deferred(id, task) {
                    warn!(error = %e, "Deferred step failed");
                }
                show_board(&session, format);
            }
        }
    }

    info!(score = ?session.score(), "Exiting");
    Ok(())
}

/// Applies one parsed command to the session.
#[instrument(skip(session))]
fn handle(session: &mut Session<TokioScheduler>, command: Command, format: OutputFormat) {
    match command {
        Command::Click(index) => {
            if let Err(e) = session.click(index) {
                eprintln!("{e}");
            }
            show_board(session, format);
        }
        Command::Action(action) => {
            session.action(action);
            if action == UiAction::Play {
                show_board(session, format);
            }
        }
        Command::CycleDifficulty => {
            let next = session.settings().difficulty.next();
            session.action(UiAction::SetDifficulty(next));
        }
        Command::Show => println!("{}", session.board().display()),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

/// Prints the grid in text mode while a round is on screen.
fn show_board(session: &Session<TokioScheduler>, format: OutputFormat) {
    let visible = matches!(
        session.state(),
        GameStateId::PlayerTurn | GameStateId::RoundComplete
    );
    if format == OutputFormat::Text && visible {
        println!("{}", session.board().display());
    }
}
