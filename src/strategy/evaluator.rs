//! Board evaluators used by the search
//!
//! An evaluator scores a board from one player's point of view; higher is
//! better for that player. The built-in evaluators read cell ownership
//! through [`CellBoard`], and any `Fn(&B, B::Player) -> f64` closure works as
//! an evaluator too.

use crate::board::{Board, CellBoard};

/// Trait for scoring a board for a given player
pub trait Evaluator<B: Board>: Send + Sync {
    /// Returns how good `board` is for `player`
    fn evaluate(&self, board: &B, player: B::Player) -> f64;
}

impl<B, F> Evaluator<B> for F
where
    B: Board,
    F: Fn(&B, B::Player) -> f64 + Send + Sync,
{
    fn evaluate(&self, board: &B, player: B::Player) -> f64 {
        self(board, player)
    }
}

/// Counts the cells the player owns
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnedCells;

impl<B: CellBoard> Evaluator<B> for OwnedCells {
    fn evaluate(&self, board: &B, player: B::Player) -> f64 {
        board.cells().filter(|cell| cell.owner == Some(player)).count() as f64
    }
}

/// Sums the levels of the cells the player owns
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelSum;

impl<B: CellBoard> Evaluator<B> for LevelSum {
    fn evaluate(&self, board: &B, player: B::Player) -> f64 {
        own_and_enemy_levels(board, player).0
    }
}

/// Minimizes the levels held by every other player
///
/// Scores the negated sum of opponents' levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyLevels;

impl<B: CellBoard> Evaluator<B> for EnemyLevels {
    fn evaluate(&self, board: &B, player: B::Player) -> f64 {
        -own_and_enemy_levels(board, player).1
    }
}

/// `own_weight * own levels - enemy levels`
#[derive(Debug, Clone, Copy)]
pub struct Weighted {
    /// Multiplier applied to the player's own level sum
    pub own_weight: f64,
}

impl Weighted {
    /// Creates a weighted evaluator
    pub fn new(own_weight: f64) -> Self {
        Weighted { own_weight }
    }
}

impl<B: CellBoard> Evaluator<B> for Weighted {
    fn evaluate(&self, board: &B, player: B::Player) -> f64 {
        let (own, enemy) = own_and_enemy_levels(board, player);
        self.own_weight * own - enemy
    }
}

fn own_and_enemy_levels<B: CellBoard>(board: &B, player: B::Player) -> (f64, f64) {
    board
        .cells()
        .fold((0.0, 0.0), |(own, enemy), cell| match cell.owner {
            Some(owner) if owner == player => (own + f64::from(cell.level), enemy),
            Some(_) => (own, enemy + f64::from(cell.level)),
            None => (own, enemy),
        })
}
