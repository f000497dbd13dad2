mod support;

use std::collections::HashMap;

use cascade_turns::{config::DEFAULT_MAX_WIDTH, LinkedTurns, Player, SchedulerConfig, TurnError};
use support::Grid;

#[test]
fn test_config_builder_methods() {
    // Test that all builder methods correctly set their respective values
    let config = SchedulerConfig::default()
        .with_max_width(64)
        .with_worker_name("speculation");

    assert_eq!(config.max_width, 64);
    assert_eq!(config.worker_name, "speculation");
}

#[test]
fn test_config_default_values() {
    let config = SchedulerConfig::default();

    assert_eq!(config.max_width, DEFAULT_MAX_WIDTH);
    assert_eq!(config.max_width, 20);
    assert_eq!(config.worker_name, "bot-search");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let zero_width = SchedulerConfig::default().with_max_width(0);
    assert!(matches!(
        zero_width.validate(),
        Err(TurnError::InvalidConfiguration(_))
    ));

    let unnamed = SchedulerConfig::default().with_worker_name("");
    assert!(matches!(
        unnamed.validate(),
        Err(TurnError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_invalid_config_rejects_scheduler() {
    let players: HashMap<u8, Player<Grid>> =
        [(0, Player::Human), (1, Player::Human)].into_iter().collect();
    let result = LinkedTurns::with_config(
        Grid::new(2, 2, &[0, 1]),
        vec![0, 1],
        players,
        SchedulerConfig::default().with_max_width(0),
    );
    assert!(matches!(
        result.err(),
        Some(TurnError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_config_chaining_is_order_independent() {
    let a = SchedulerConfig::default()
        .with_max_width(8)
        .with_worker_name("bots");
    let b = SchedulerConfig::default()
        .with_worker_name("bots")
        .with_max_width(8);
    assert_eq!(a, b);
}
