//! Tests for configuration loading.

use std::io::Write;
use std::time::Duration;
use strictly_ttt::{Difficulty, EngineConfig};
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = EngineConfig::default();
    assert_eq!(*config.difficulty(), Difficulty::Easy);
    assert_eq!(config.enemy_move_delay(), Duration::from_millis(500));
    assert_eq!(config.restart_delay(), Duration::from_millis(500));
    assert_eq!(*config.seed(), None);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = EngineConfig::from_toml("").unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
difficulty = "hard"
enemy_move_delay_ms = 10
seed = 42
"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.difficulty(), Difficulty::Hard);
    assert_eq!(*config.enemy_move_delay_ms(), 10);
    assert_eq!(*config.restart_delay_ms(), 500);
    assert_eq!(*config.seed(), Some(42));
}

#[test]
fn test_invalid_toml_is_rejected() {
    let err = EngineConfig::from_toml("difficulty = \"impossible\"").unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn test_missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_builders_override() {
    let config = EngineConfig::default()
        .with_difficulty(Difficulty::Medium)
        .with_seed(7)
        .with_delays_ms(0, 0);
    assert_eq!(*config.difficulty(), Difficulty::Medium);
    assert_eq!(*config.seed(), Some(7));
    assert_eq!(config.enemy_move_delay(), Duration::ZERO);
}
