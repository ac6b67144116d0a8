//! Tests for the event bus and its recording subscriber.

use std::cell::RefCell;
use std::rc::Rc;
use strictly_ttt::{
    Cell, Difficulty, EventBus, EventKind, EventLog, GameEvent, GameStateId, Mark, Position,
    UiAction,
};

#[test]
fn test_subscribers_notified_in_order() {
    let mut bus = EventBus::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = order.clone();
    bus.subscribe(move |_: &GameEvent| first.borrow_mut().push("first"));
    let second = order.clone();
    bus.subscribe(move |_: &GameEvent| second.borrow_mut().push("second"));

    bus.publish(GameEvent::GameStateChanged {
        state: GameStateId::MainMenu,
    });
    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut bus = EventBus::new();
    let log = EventLog::new();
    let id = bus.subscribe(log.clone());

    bus.publish(GameEvent::CellClickIntent { index: 3 });
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    bus.publish(GameEvent::CellClickIntent { index: 4 });

    assert_eq!(log.events(), vec![GameEvent::CellClickIntent { index: 3 }]);
}

#[test]
fn test_published_events_queue_for_engine() {
    let mut bus = EventBus::new();
    assert!(!bus.has_pending());
    bus.publish(GameEvent::CellClickIntent { index: 1 });
    bus.publish(GameEvent::UiActionIntent {
        action: UiAction::Play,
    });
    assert!(bus.has_pending());
    assert_eq!(
        bus.next_pending(),
        Some(GameEvent::CellClickIntent { index: 1 })
    );
    assert_eq!(
        bus.next_pending(),
        Some(GameEvent::UiActionIntent {
            action: UiAction::Play
        })
    );
    assert_eq!(bus.next_pending(), None);
}

#[test]
fn test_event_log_filters_by_kind() {
    let mut bus = EventBus::new();
    let log = EventLog::new();
    bus.subscribe(log.clone());

    bus.publish(GameEvent::CellChanged {
        position: Position::Center,
        cell: Cell::Marked(Mark::X),
    });
    bus.publish(GameEvent::DifficultyChanged {
        difficulty: Difficulty::Hard,
    });

    assert_eq!(log.len(), 2);
    assert_eq!(log.of_kind(EventKind::DifficultyChanged).len(), 1);
    assert!(log.of_kind(EventKind::ScoreChanged).is_empty());

    log.clear();
    assert!(log.is_empty());
}

#[test]
fn test_events_serialize_with_tag() {
    let event = GameEvent::CellChanged {
        position: Position::TopRight,
        cell: Cell::Marked(Mark::O),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "cell_changed");
    assert_eq!(json["position"], 2);

    let action = GameEvent::UiActionIntent {
        action: UiAction::SetDifficulty(Difficulty::Medium),
    };
    let text = serde_json::to_string(&action).unwrap();
    let back: GameEvent = serde_json::from_str(&text).unwrap();
    assert_eq!(back, action);
}
