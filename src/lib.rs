//! # cascade-turns
//!
//! Speculative turn scheduling for turn-based board games in which every move
//! sets off a chain reaction of board changes.
//!
//! While a human player is thinking, the crate is already working out what
//! every bot will do on each branch the game could take next. When it is
//! actually a bot's turn the answer is usually waiting.
//!
//! ## Pieces
//!
//! - [`Board`]: the game collaborator. Legal moves, move application producing
//!   a sequence of transitions, player-order rotation and liveness.
//! - [`strategy`]: a bounded-depth, worst-case search ([`strategy::estimate_turn`])
//!   and pluggable evaluators layered on top of it.
//! - [`link`]: the future-turn tree. An arena of [`Link`] nodes joined by
//!   [`Next`] edges.
//! - [`LinkedTurns`]: the scheduler that grows the tree, runs at most one bot
//!   search at a time, and cancels branches the moment they become obsolete.
//! - [`Game`]: the orchestrator a caller drives turn by turn.
//! - [`grid`]: a ready-made chain-reaction board.
//!
//! ## Basic Usage
//!
//! A board only has to describe its moves, who is still playing and what
//! happens when a move is applied. Here two players race to six points:
//!
//! ```
//! use std::collections::HashMap;
//! use cascade_turns::{Board, Bot, Game, Player, SearchStrategy};
//!
//! #[derive(Clone)]
//! struct Race {
//!     scores: [u32; 2],
//! }
//!
//! impl Board for Race {
//!     type Move = usize;
//!     type Player = usize;
//!     type Transition = u32;
//!
//!     fn legal_moves(&self, player: usize) -> Vec<usize> {
//!         if self.is_alive(player) { vec![1, 2] } else { Vec::new() }
//!     }
//!
//!     // Whoever falls behind a finished runner is out
//!     fn is_alive(&self, player: usize) -> bool {
//!         self.scores[1 - player] < 6
//!     }
//!
//!     fn apply_move(&mut self, player: usize, mv: &usize) -> impl Iterator<Item = u32> {
//!         self.scores[player] += *mv as u32;
//!         std::iter::once(self.scores[player])
//!     }
//!
//!     fn players(&self) -> Vec<usize> {
//!         vec![0, 1]
//!     }
//! }
//!
//! let greedy = SearchStrategy::new(|board: &Race, player: usize| f64::from(board.scores[player]));
//! let mut players: HashMap<usize, Player<Race>> = HashMap::new();
//! players.insert(0, Player::Human);
//! players.insert(1, Player::Bot(Bot::new("greedy", 1, greedy)));
//!
//! let mut game = Game::new(Race { scores: [0, 0] }, vec![0, 1], players)?;
//! game.apply_human_turn(&2)?;
//!
//! // The bot's answer was computed while the human was still deciding
//! let bot_turn = game.apply_bot_turn()?;
//! assert_eq!(bot_turn.mv, 2);
//! assert_eq!(game.board().scores, [2, 2]);
//! # Ok::<(), cascade_turns::TurnError>(())
//! ```
//!
//! ## How It Works
//!
//! 1. **Discovery**: the shallowest unexplored branch is expanded. A human
//!    branch point becomes one child per legal move; a bot branch point is
//!    handed to admission control.
//! 2. **Admission**: a single slot runs one search. Everything else waits in a
//!    backlog ordered by depth, shallowest first.
//! 3. **Resolution**: a finished search records the chosen move and opens a new
//!    unexplored branch behind it.
//! 4. **Cancellation**: when the human picks a move, every sibling branch is
//!    cancelled. Queued searches are dropped, the running one is signalled, and
//!    any late result it produces is discarded.
//!
//! Expansion stops once the number of open leaves reachable from the next
//! turn reaches [`SchedulerConfig::max_width`].

pub mod board;
pub mod cancel;
pub mod config;
pub mod executor;
pub mod game;
pub mod grid;
pub mod link;
pub mod observer;
pub mod player;
pub mod scheduler;
pub mod stats;
pub mod strategy;

pub use board::{Board, CellBoard, CellView, Move, PlayerId};
pub use cancel::CancelToken;
pub use config::SchedulerConfig;
pub use game::{Game, GameSnapshot, TurnEvent};
pub use link::{FocusView, Link, LinkId, Next, Trans};
pub use observer::{Subscription, TurnObservers};
pub use player::{Bot, BotSpec, Player, StrategyKind};
pub use scheduler::{BotTurn, BotTurnHandle, Computation, LinkedTurns};
pub use stats::SchedulerStatistics;
pub use strategy::{SearchStrategy, Strategy};

/// Error types for turn scheduling and search
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// A scheduler or game was constructed without any players
    #[error("Player order is empty")]
    EmptyOrder,

    /// A player appears in the order but has no Human/Bot assignment
    #[error("Player {0} has no Human or Bot assignment")]
    UnknownPlayer(String),

    /// A human move was submitted while the next turn is not a human choice
    #[error("It is not a human player's turn")]
    NotHumanTurn,

    /// A bot turn was requested while the next turn is not a bot's
    #[error("It is not a bot player's turn")]
    NotBotTurn,

    /// The submitted move is not among the legal moves of the current branch
    #[error("Move {0} is not legal here")]
    IllegalMove(String),

    /// The mover has no legal move to choose from
    #[error("No legal moves available")]
    NoLegalMoves,

    /// A computation result arrived for a branch other than the one it was started for
    #[error("Computation {found} does not match the expected computation {expected}")]
    ComputationMismatch {
        /// Identity the branch or slot was holding
        expected: String,
        /// Identity that was presented
        found: String,
    },

    /// The computation was cancelled before it produced a result
    #[error("Computation cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The background worker could not be started or has gone away
    #[error("Worker failure: {0}")]
    Worker(String),
}

/// Result type for turn scheduling operations
pub type Result<T> = std::result::Result<T, TurnError>;
