mod support;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cascade_turns::{
    strategy::{OwnedCells, RandomStrategy},
    Board, Bot, BotSpec, FocusView, Game, GameSnapshot, Player, SchedulerConfig, SearchStrategy,
    StrategyKind, TurnError,
};
use parking_lot::Mutex;
use support::{init_logging, wait_until, GateStrategy, Grid, Script, ScriptBoard, Step};

fn human_vs_gated_bot() -> (Game<ScriptBoard>, support::Gate) {
    let board = Script::new(&[0, 1])
        .moves(&[], &[0])
        .moves(&[0], &[1, 2])
        .moves(&[0, 1], &[4])
        .board();
    let (gate_strategy, gate) = GateStrategy::new();
    let mut players = HashMap::new();
    players.insert(0, Player::Human);
    players.insert(1, Player::Bot(Bot::new("gated", 1, gate_strategy)));
    (Game::new(board, vec![0, 1], players).unwrap(), gate)
}

fn human_vs_bot(board: Grid) -> Game<Grid> {
    let mut players = HashMap::new();
    players.insert(0, Player::Human);
    players.insert(1, Player::Bot(Bot::new("cells", 1, SearchStrategy::new(OwnedCells))));
    Game::new(board, vec![0, 1], players).unwrap()
}

#[test]
fn test_human_and_bot_alternate() {
    init_logging();
    let mut game = human_vs_bot(Grid::new(3, 3, &[0, 1]));

    for turn in 0..6 {
        if game.is_game_over() {
            break;
        }
        if game.is_human_turn() {
            let mv = game.legal_moves()[0];
            game.apply_human_turn(&mv).unwrap();
        } else {
            assert!(game.is_bot_turn());
            let played = game.apply_bot_turn().unwrap();
            assert_eq!(played.player, 1);
        }
        assert_eq!(game.turns_applied(), turn + 1);
        // The live board always matches the scheduler's position
        assert_eq!(game.board(), game.scheduler().current().board());
        assert_eq!(game.order(), game.scheduler().current().order());
    }
}

#[test]
fn test_turn_kind_guards() {
    init_logging();
    let mut game = human_vs_bot(Grid::new(3, 3, &[0, 1]));

    assert!(game.is_human_turn());
    assert_eq!(game.apply_bot_turn().err(), Some(TurnError::NotBotTurn));
    assert_eq!(game.request_bot_turn().err(), Some(TurnError::NotBotTurn));

    game.apply_human_turn(&4).unwrap();
    assert!(game.is_bot_turn());
    assert_eq!(game.apply_human_turn(&0).err(), Some(TurnError::NotHumanTurn));
}

#[test]
fn test_bot_turn_is_applied_once() {
    init_logging();
    let mut players = HashMap::new();
    players.insert(0, Player::Bot(Bot::new("a", 1, RandomStrategy::seeded(5))));
    players.insert(1, Player::Bot(Bot::new("b", 1, RandomStrategy::seeded(6))));
    let mut game = Game::new(Grid::new(3, 3, &[0, 1]), vec![0, 1], players).unwrap();

    let first = game.request_bot_turn().unwrap().wait().unwrap();
    game.complete_bot_turn(&first).unwrap();
    let second = game.request_bot_turn().unwrap().wait().unwrap();
    game.complete_bot_turn(&second).unwrap();

    // P0 is to move again, but the old turn belongs to an earlier point
    assert_eq!(game.current_player(), Some(0));
    assert!(matches!(
        game.complete_bot_turn(&first),
        Err(TurnError::ComputationMismatch { .. })
    ));
    assert_eq!(game.turns_applied(), 2);
}

#[test]
fn test_dropped_request_does_not_strand_the_game() {
    init_logging();
    let (mut game, gate) = human_vs_gated_bot();

    game.apply_human_turn(&0).unwrap();
    drop(game.request_bot_turn().unwrap());
    gate.open();
    assert!(wait_until(|| game.scheduler().traversed_turns() == 2));
    assert!(game.is_bot_turn());

    let turn = game.apply_bot_turn().unwrap();
    assert_eq!(turn.mv, 1);
    assert_eq!(game.turns_applied(), 2);
    assert!(game.is_human_turn());
    assert_eq!(game.board().history(), &[0, 1]);
    assert_eq!(game.legal_moves(), vec![4]);
    game.apply_human_turn(&4).unwrap();
    assert_eq!(game.turns_applied(), 3);
}

#[test]
fn test_second_request_returns_the_same_turn() {
    init_logging();
    let (mut game, gate) = human_vs_gated_bot();

    game.apply_human_turn(&0).unwrap();
    gate.open();
    assert!(wait_until(|| matches!(
        game.focus(),
        FocusView::BotComputed { .. }
    )));

    let first = game.request_bot_turn().unwrap().wait().unwrap();
    let second = game.request_bot_turn().unwrap().wait().unwrap();
    assert_eq!(first.mv, 1);
    assert_eq!(second.mv, first.mv);
    assert_eq!(second.turn, first.turn);
    assert_eq!(game.scheduler().statistics().computations_completed, 1);

    game.complete_bot_turn(&first).unwrap();
    assert!(game.complete_bot_turn(&second).is_err());
    assert_eq!(game.turns_applied(), 2);
    assert!(game.is_human_turn());
}

#[test]
fn test_live_board_matches_replayed_move() {
    init_logging();
    let start = Grid::new(2, 2, &[0, 1]).with_cell(0, 0, 1, 1);
    let mut game = human_vs_bot(start.clone());

    let trans = game.apply_human_turn(&1).unwrap();
    let mut replayed = start;
    let steps: Vec<Step> = replayed.apply_move(0, &1).collect();

    assert_eq!(trans.transitions(), steps.as_slice());
    assert_eq!(game.board(), &replayed);
}

#[test]
fn test_observers_see_each_turn() {
    init_logging();
    let mut game = human_vs_bot(Grid::new(3, 3, &[0, 1]));
    let count = Arc::new(AtomicUsize::new(0));
    let movers = Arc::new(Mutex::new(Vec::new()));

    let subscription = {
        let count = Arc::clone(&count);
        let movers = Arc::clone(&movers);
        game.subscribe(move |event| {
            count.fetch_add(1, Ordering::SeqCst);
            movers.lock().push(event.player);
        })
    };

    game.apply_human_turn(&4).unwrap();
    game.apply_bot_turn().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(*movers.lock(), vec![0, 1]);

    drop(subscription);
    let mv = game.legal_moves()[0];
    game.apply_human_turn(&mv).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_capturing_every_cell_ends_the_game() {
    init_logging();
    let board = Grid::new(2, 2, &[0, 1])
        .with_cell(0, 0, 0, 1)
        .with_cell(1, 0, 1, 1);
    let mut players = HashMap::new();
    players.insert(0, Player::Human);
    players.insert(1, Player::Human);
    let mut game = Game::new(board, vec![0, 1], players).unwrap();

    let trans = game.apply_human_turn(&0).unwrap();
    assert_eq!(
        trans.transitions(),
        &[
            Step::Place { cell: 0, player: 0 },
            Step::Explode { cell: 0 },
            Step::Capture { cell: 1, player: 0 },
            Step::Capture { cell: 2, player: 0 },
        ]
    );

    assert!(game.is_game_over());
    assert!(!game.is_alive(1));
    assert_eq!(game.order(), &[0]);
    assert_eq!(game.focus(), FocusView::End);
    assert!(game.legal_moves().is_empty());
}

#[test]
fn test_single_player_game_is_over() {
    let mut players = HashMap::new();
    players.insert(0, Player::Human);
    let mut game = Game::new(Grid::new(2, 2, &[0]), vec![0], players).unwrap();

    assert!(game.is_game_over());
    assert!(!game.is_human_turn());
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.apply_human_turn(&0).err(), Some(TurnError::NotHumanTurn));
}

#[test]
fn test_game_from_snapshot() {
    init_logging();
    let mut bots = HashMap::new();
    bots.insert(1, BotSpec::new("cells", 1, StrategyKind::OwnedCells));
    let snapshot = GameSnapshot {
        board: Grid::new(3, 3, &[0, 1]),
        bots,
        order: vec![0, 1],
    };
    let mut game = Game::from_snapshot(snapshot, SchedulerConfig::default()).unwrap();

    assert!(game.is_human_turn());
    assert_eq!(game.legal_moves().len(), 9);

    let trans = game.apply_human_turn(&4).unwrap();
    assert_eq!(trans.transitions(), &[Step::Place { cell: 4, player: 0 }]);

    assert!(game.is_bot_turn());
    let turn = game.apply_bot_turn().unwrap();
    assert_eq!(turn.player, 1);
    assert!(game.is_human_turn());
    assert_eq!(game.turns_applied(), 2);
    assert_eq!(game.board().owned_by(1), 1);
}
