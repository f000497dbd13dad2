//! Trivial strategy: a uniformly random legal move, no search.

use parking_lot::Mutex;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{board::Board, cancel::CancelToken, strategy::Strategy, Result, TurnError};

/// Picks uniformly at random among the legal moves
///
/// The search depth is ignored.
#[derive(Debug, Default)]
pub struct RandomStrategy {
    rng: Option<Mutex<StdRng>>,
}

impl RandomStrategy {
    /// Creates a random strategy backed by the thread-local generator
    pub fn new() -> Self {
        RandomStrategy { rng: None }
    }

    /// Creates a random strategy with a reproducible sequence of choices
    pub fn seeded(seed: u64) -> Self {
        RandomStrategy {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl<B: Board> Strategy<B> for RandomStrategy {
    fn choose_move(
        &self,
        board: &B,
        player: B::Player,
        _order: &[B::Player],
        _depth: usize,
        cancel: &CancelToken,
    ) -> Result<B::Move> {
        cancel.check()?;
        let moves = board.legal_moves(player);
        let choice = match &self.rng {
            Some(rng) => moves.choose(&mut *rng.lock()),
            None => moves.choose(&mut rand::thread_rng()),
        };
        choice.cloned().ok_or(TurnError::NoLegalMoves)
    }
}
