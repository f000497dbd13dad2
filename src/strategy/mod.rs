//! Bot strategies
//!
//! This module contains the ways a bot can pick its move:
//! - [`SearchStrategy`]: bounded worst-case search driven by an [`Evaluator`]
//! - [`RandomStrategy`]: a uniformly random legal move
//!
//! and the evaluators the search can be driven by.

pub mod evaluator;
pub mod random;
pub mod search;

pub use evaluator::{EnemyLevels, Evaluator, LevelSum, OwnedCells, Weighted};
pub use random::RandomStrategy;
pub use search::{best_move, estimate_turn, round_variations};

use crate::{board::Board, cancel::CancelToken, Result};

/// Trait for the pluggable logic that picks a bot's move
pub trait Strategy<B: Board>: Send + Sync {
    /// Chooses a move for `player` on `board`
    ///
    /// `order` is the current player order starting with `player`, `depth` the
    /// bot's search depth. Long-running implementations must poll `cancel`
    /// and return [`TurnError::Cancelled`](crate::TurnError::Cancelled) once it
    /// is set.
    fn choose_move(
        &self,
        board: &B,
        player: B::Player,
        order: &[B::Player],
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<B::Move>;
}

/// Search strategy scoring moves with [`estimate_turn`]
#[derive(Debug, Clone)]
pub struct SearchStrategy<E> {
    evaluator: E,
}

impl<E> SearchStrategy<E> {
    /// Creates a search strategy driven by `evaluator`
    pub fn new(evaluator: E) -> Self {
        SearchStrategy { evaluator }
    }

    /// Returns the evaluator driving this strategy
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl<B, E> Strategy<B> for SearchStrategy<E>
where
    B: Board,
    E: Evaluator<B>,
{
    fn choose_move(
        &self,
        board: &B,
        player: B::Player,
        order: &[B::Player],
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<B::Move> {
        best_move(board, player, order, depth, &self.evaluator, cancel)
    }
}
