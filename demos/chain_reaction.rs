//! Chain-reaction example for the turn scheduler
//!
//! You play against two bots on a 4x4 board. While you think, the scheduler
//! speculatively computes the bots' answers to each of your possible moves.
//! Enter a move as `x y`; an empty line (or end of input) plays your first
//! legal move.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use cascade_turns::{
    grid::{Cell, Grid, Step},
    strategy::{OwnedCells, Weighted},
    Bot, FocusView, Game, Player, SchedulerConfig, SearchStrategy,
};

const HUMAN: u8 = 0;

fn main() {
    // Initialize logging
    env_logger::init();

    println!("Chain Reaction Example");
    println!("======================");
    println!();

    let board = Grid::new(4, 4, &[0, 1, 2]);
    let mut players = HashMap::new();
    players.insert(HUMAN, Player::Human);
    players.insert(
        1,
        Player::Bot(Bot::new("greedy", 1, SearchStrategy::new(OwnedCells))),
    );
    players.insert(
        2,
        Player::Bot(Bot::new("weighted", 1, SearchStrategy::new(Weighted::new(1.5)))),
    );

    let config = SchedulerConfig::default().with_max_width(40);
    let mut game = match Game::with_config(board, vec![0, 1, 2], players, config) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Could not start the game: {}", err);
            return;
        }
    };

    let _log = game.subscribe(|event| {
        let explosions = event
            .trans
            .transitions()
            .iter()
            .filter(|step| matches!(step, Step::Explode { .. }))
            .count();
        println!(
            "Player {} played cell {} ({} explosions)",
            event.player, event.mv, explosions
        );
    });

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut turns = 0;

    while !game.is_game_over() && turns < 200 {
        turns += 1;
        if game.is_human_turn() {
            render(game.board());
            let legal = game.legal_moves();
            print!("Your move (x y): ");
            io::stdout().flush().ok();

            let input = lines.next().and_then(|line| line.ok()).unwrap_or_default();
            let mv = match parse_move(&input, game.board()) {
                Some(mv) if legal.contains(&mv) => mv,
                Some(_) => {
                    println!("That cell belongs to someone else.");
                    continue;
                }
                None => match legal.first() {
                    Some(&mv) => mv,
                    None => break,
                },
            };
            if let Err(err) = game.apply_human_turn(&mv) {
                println!("Rejected: {}", err);
            }
        } else {
            if let FocusView::BotComputed { player, .. } = game.focus() {
                println!("Player {} had its answer ready", player);
            }
            if let Err(err) = game.apply_bot_turn() {
                println!("Bot failed to move: {}", err);
                break;
            }
        }
    }

    render(game.board());
    match game.current_player() {
        Some(winner) if game.is_game_over() => println!("Player {} wins!", winner),
        _ => println!("No winner after {} turns", turns),
    }
    println!();
    println!("{}", game.scheduler().statistics().summary());
}

fn parse_move(input: &str, board: &Grid) -> Option<usize> {
    let coords: Vec<usize> = input
        .split_whitespace()
        .filter_map(|s| s.parse::<usize>().ok())
        .collect();
    match coords.as_slice() {
        [x, y] if *x < board.width() && *y < board.height() => Some(board.index(*x, *y)),
        _ => None,
    }
}

fn render(board: &Grid) {
    println!();
    for y in 0..board.height() {
        let row: Vec<String> = (0..board.width())
            .map(|x| match board.cell(x, y) {
                Some(Cell {
                    owner: Some(owner),
                    level,
                }) => format!("{}:{}", owner, level),
                _ => " . ".to_string(),
            })
            .collect();
        println!("  {}", row.join(" "));
    }
    println!();
}
