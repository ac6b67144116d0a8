//! End-to-end tests driving a session through its public intents.

use std::time::Duration;
use strictly_ttt::{
    Deferred, Difficulty, EngineConfig, EventKind, EventLog, GameEvent, GameStateId,
    ImmediateScheduler, ManualScheduler, Mark, Position, RoundOutcome, RoundResult, Score,
    Session, Side, TokioScheduler, UiAction,
};

fn manual_session(seed: u64) -> (Session<ManualScheduler>, EventLog) {
    let config = EngineConfig::default().with_seed(seed);
    let mut session = Session::new(config, ManualScheduler::new());
    let log = EventLog::new();
    session.subscribe(log.clone());
    session.start();
    (session, log)
}

#[test]
fn test_clicks_outside_player_turn_are_dropped() {
    let (mut session, log) = manual_session(1);
    log.clear();

    session.click(4).unwrap();
    assert_eq!(session.state(), GameStateId::MainMenu);
    assert!(session.board().cells().iter().all(|c| c.is_empty()));
    // Only the intent itself was published.
    assert_eq!(log.events(), vec![GameEvent::CellClickIntent { index: 4 }]);

    session.action(UiAction::Play);
    session.click(4).unwrap();
    assert_eq!(session.state(), GameStateId::EnemyTurn);
    session.click(0).unwrap();
    assert_eq!(session.board().count(Mark::X), 1);
}

#[test]
fn test_invalid_click_in_player_turn_errors() {
    let (mut session, _log) = manual_session(1);
    session.action(UiAction::Play);

    let err = session.click(9).unwrap_err();
    assert_eq!(err.index, 9);
    assert!(session.click(-1).is_err());
    assert_eq!(session.state(), GameStateId::PlayerTurn);
}

#[test]
fn test_occupied_cell_click_is_ignored() {
    let (mut session, _log) = manual_session(2);
    session.action(UiAction::Play);
    session.click(4).unwrap();
    assert!(session.advance().unwrap());
    assert_eq!(session.state(), GameStateId::PlayerTurn);

    session.click(4).unwrap();
    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert_eq!(session.board().count(Mark::X), 1);
}

#[test]
fn test_enemy_move_waits_for_scheduler() {
    let (mut session, log) = manual_session(3);
    session.action(UiAction::Play);
    session.click(0).unwrap();

    assert_eq!(session.state(), GameStateId::EnemyTurn);
    assert_eq!(session.board().count(Mark::O), 0);
    assert_eq!(session.scheduler().pending(), vec![Deferred::EnemyMove]);

    log.clear();
    assert!(session.advance().unwrap());
    assert_eq!(session.board().count(Mark::O), 1);
    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert_eq!(log.of_kind(EventKind::CellChanged).len(), 1);
    assert!(!session.advance().unwrap());
}

#[test]
fn test_raised_facts_are_dropped() {
    let (mut session, log) = manual_session(12);
    session.action(UiAction::Play);
    log.clear();

    let forged = [
        GameEvent::RoundResult { outcome: None },
        GameEvent::RoundResult {
            outcome: Some(RoundOutcome::new(
                vec![Position::TopLeft, Position::TopCenter, Position::TopRight],
                Some(Mark::X),
                RoundResult::PlayerWin,
            )),
        },
        GameEvent::ScoreChanged {
            side: Side::Player,
            value: 5,
        },
        GameEvent::GameStateChanged {
            state: GameStateId::RoundComplete,
        },
    ];
    for event in forged {
        session.raise(event).unwrap();
    }

    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert_eq!(*session.score(), Score::new());
    assert!(session.scheduler().pending().is_empty());
    assert!(session.board().cells().iter().all(|c| c.is_empty()));
    assert!(log.is_empty(), "forged facts must not reach subscribers");

    // Real intents still work afterwards.
    session.click(4).unwrap();
    assert_eq!(session.state(), GameStateId::EnemyTurn);
    assert!(session.advance().unwrap());
    assert_eq!(session.board().count(Mark::O), 1);
}

#[test]
fn test_new_game_starts_from_first_round() {
    let config = EngineConfig::default().with_seed(13);
    let mut session = Session::new(config, ImmediateScheduler::new());
    session.start();

    // Play rounds until the AI has won one, so the next round would hand it X.
    session.action(UiAction::Play);
    let mut enemy_won = false;
    for _ in 0..500 {
        while session.state() == GameStateId::PlayerTurn {
            let free = session.board().empty_positions()[0];
            session.click(free.to_index() as i64).unwrap();
        }
        assert_eq!(session.state(), GameStateId::RoundComplete);
        if session.board().round_result() == Some(RoundResult::EnemyWin) {
            enemy_won = true;
            break;
        }
        session.action(UiAction::Restart);
    }
    assert!(enemy_won, "AI never won a round");
    let score = *session.score();
    assert!(*score.enemy() >= 1);

    session.action(UiAction::Exit);
    assert_eq!(session.state(), GameStateId::MainMenu);
    session.action(UiAction::Play);

    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert_eq!(session.board().player_sign(), Mark::X);
    assert_eq!(session.board().round_result(), None);
    assert_eq!(session.board().previous_round_result(), None);
    assert!(session.board().cells().iter().all(|c| c.is_empty()));
    // The score outlives the game context.
    assert_eq!(*session.score(), score);
}

#[test]
fn test_withdrawn_timer_delivery_is_dropped() {
    let (mut session, _log) = manual_session(14);
    session.action(UiAction::Play);
    session.click(4).unwrap();

    // The timer fires, but the step is still in flight when the player leaves.
    let (stale, task) = session.scheduler_mut().pop().unwrap();
    assert_eq!(task, Deferred::EnemyMove);
    session.action(UiAction::Exit);
    session.action(UiAction::Play);
    session.click(0).unwrap();
    assert_eq!(session.state(), GameStateId::EnemyTurn);

    session.run_deferred(stale, Deferred::EnemyMove).unwrap();
    assert_eq!(session.state(), GameStateId::EnemyTurn);
    assert_eq!(session.board().count(Mark::O), 0);
    assert_eq!(session.scheduler().pending(), vec![Deferred::EnemyMove]);

    // The current round's own timer still runs the move.
    assert!(session.advance().unwrap());
    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert_eq!(session.board().count(Mark::O), 1);
}

#[test]
fn test_difficulty_change_publishes_once() {
    let (mut session, log) = manual_session(4);
    log.clear();

    session.action(UiAction::SetDifficulty(Difficulty::Easy));
    assert!(log.of_kind(EventKind::DifficultyChanged).is_empty());

    session.action(UiAction::SetDifficulty(Difficulty::Hard));
    assert_eq!(
        log.of_kind(EventKind::DifficultyChanged),
        vec![GameEvent::DifficultyChanged {
            difficulty: Difficulty::Hard
        }]
    );
    assert_eq!(session.settings().difficulty, Difficulty::Hard);
}

#[test]
fn test_exit_returns_to_main_menu() {
    let (mut session, log) = manual_session(5);
    session.action(UiAction::Play);
    log.clear();

    session.action(UiAction::Exit);
    assert_eq!(session.state(), GameStateId::MainMenu);
    assert_eq!(
        log.of_kind(EventKind::GameStateChanged),
        vec![
            GameEvent::GameStateChanged {
                state: GameStateId::LeaveGame
            },
            GameEvent::GameStateChanged {
                state: GameStateId::MainMenu
            },
        ]
    );

    // Exit from the menu means nothing.
    log.clear();
    session.action(UiAction::Exit);
    assert!(log.of_kind(EventKind::GameStateChanged).is_empty());
}

#[test]
fn test_restart_ignored_mid_round() {
    let (mut session, _log) = manual_session(6);
    session.action(UiAction::Play);
    session.action(UiAction::Restart);
    assert!(session.scheduler().pending().is_empty());
    assert_eq!(session.state(), GameStateId::PlayerTurn);
}

#[test]
fn test_full_game_with_immediate_scheduler_completes() {
    let config = EngineConfig::default()
        .with_seed(17)
        .with_difficulty(Difficulty::Hard);
    let mut session = Session::new(config, ImmediateScheduler::new());
    session.start();
    session.action(UiAction::Play);

    // Keep taking the first free cell until the round ends.
    while session.state() == GameStateId::PlayerTurn {
        let free = session.board().empty_positions()[0];
        session.click(free.to_index() as i64).unwrap();
    }
    assert_eq!(session.state(), GameStateId::RoundComplete);
    let outcome = session.last_outcome().expect("round decided");
    let score = session.score();
    match outcome.result().winner() {
        Some(side) => assert_eq!(score.of(side), 1),
        None => assert_eq!((*score.player(), *score.enemy()), (0, 0)),
    }

    let snapshot = session.snapshot();
    assert_eq!(*snapshot.state(), GameStateId::RoundComplete);
    assert_eq!(snapshot.last_outcome().as_ref(), Some(outcome));

    // Play again runs inline and opens a fresh round.
    session.action(UiAction::Restart);
    // Whoever opens, the AI's reply runs inline so the human is up next.
    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert!(session.last_outcome().is_none());
}

#[test]
fn test_snapshot_serializes() {
    let (mut session, _log) = manual_session(8);
    session.action(UiAction::Play);
    session.click(4).unwrap();
    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["state"], "enemy_turn");
    assert_eq!(json["difficulty"], "easy");
}

#[tokio::test]
async fn test_tokio_scheduler_delivers_enemy_move() {
    let config = EngineConfig::default().with_seed(9).with_delays_ms(5, 5);
    let (scheduler, mut deferred) = TokioScheduler::new();
    let mut session = Session::new(config, scheduler);
    session.start();
    session.action(UiAction::Play);
    session.click(4).unwrap();
    assert_eq!(session.state(), GameStateId::EnemyTurn);

    let (handle, task) = tokio::time::timeout(Duration::from_secs(5), deferred.recv())
        .await
        .expect("enemy move should arrive")
        .expect("channel open");
    assert_eq!(task, Deferred::EnemyMove);
    session.run_deferred(handle, task).unwrap();
    assert_eq!(session.state(), GameStateId::PlayerTurn);
    assert_eq!(session.board().count(Mark::O), 1);
}

#[tokio::test]
async fn test_tokio_scheduler_cancels_on_exit() {
    let config = EngineConfig::default().with_seed(10).with_delays_ms(20, 20);
    let (scheduler, mut deferred) = TokioScheduler::new();
    let mut session = Session::new(config, scheduler);
    session.start();
    session.action(UiAction::Play);
    session.click(4).unwrap();
    session.action(UiAction::Exit);

    let late = tokio::time::timeout(Duration::from_millis(100), deferred.recv()).await;
    assert!(late.is_err(), "cancelled move must not be delivered");
    assert_eq!(session.state(), GameStateId::MainMenu);
}
