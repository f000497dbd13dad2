//! Human and bot players.

use std::fmt;
use std::sync::Arc;

use crate::{
    board::{Board, CellBoard},
    cancel::CancelToken,
    strategy::{
        EnemyLevels, LevelSum, OwnedCells, RandomStrategy, SearchStrategy, Strategy, Weighted,
    },
    Result,
};

/// A seat at the table: a human choosing among legal moves, or a bot whose
/// move is computed
pub enum Player<B: Board> {
    /// Moves are supplied by the caller
    Human,
    /// Moves are computed by a strategy
    Bot(Bot<B>),
}

impl<B: Board> Player<B> {
    /// True for [`Player::Bot`]
    pub fn is_bot(&self) -> bool {
        matches!(self, Player::Bot(_))
    }

    /// True for [`Player::Human`]
    pub fn is_human(&self) -> bool {
        matches!(self, Player::Human)
    }
}

impl<B: Board> Clone for Player<B> {
    fn clone(&self) -> Self {
        match self {
            Player::Human => Player::Human,
            Player::Bot(bot) => Player::Bot(bot.clone()),
        }
    }
}

impl<B: Board> fmt::Debug for Player<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Human => write!(f, "Human"),
            Player::Bot(bot) => f.debug_tuple("Bot").field(bot).finish(),
        }
    }
}

/// A named strategy paired with the depth it searches to
pub struct Bot<B: Board> {
    name: String,
    depth: usize,
    strategy: Arc<dyn Strategy<B>>,
}

impl<B: Board> Bot<B> {
    /// Creates a bot running `strategy` at `depth`
    pub fn new(
        name: impl Into<String>,
        depth: usize,
        strategy: impl Strategy<B> + 'static,
    ) -> Self {
        Self::from_arc(name, depth, Arc::new(strategy))
    }

    /// Creates a bot sharing an existing strategy
    pub fn from_arc(
        name: impl Into<String>,
        depth: usize,
        strategy: Arc<dyn Strategy<B>>,
    ) -> Self {
        Bot {
            name: name.into(),
            depth,
            strategy,
        }
    }

    /// Display name of the bot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rounds the bot searches ahead
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Runs the bot's strategy for `player` on `board`
    pub fn choose_move(
        &self,
        board: &B,
        player: B::Player,
        order: &[B::Player],
        cancel: &CancelToken,
    ) -> Result<B::Move> {
        self.strategy.choose_move(board, player, order, self.depth, cancel)
    }
}

impl<B: Board> Clone for Bot<B> {
    fn clone(&self) -> Self {
        Bot {
            name: self.name.clone(),
            depth: self.depth,
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<B: Board> fmt::Debug for Bot<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("name", &self.name)
            .field("depth", &self.depth)
            .finish()
    }
}

/// The built-in strategies, as plain data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyKind {
    /// Uniformly random legal move, no search
    Random,
    /// Search maximizing the number of owned cells
    OwnedCells,
    /// Search maximizing the player's level sum
    LevelSum,
    /// Search minimizing the opponents' level sum
    EnemyLevels,
    /// Search maximizing `own_weight * own levels - enemy levels`
    Weighted {
        /// Multiplier on the player's own level sum
        own_weight: f64,
    },
}

/// A persisted bot assignment
#[derive(Debug, Clone, PartialEq)]
pub struct BotSpec {
    /// Display name
    pub name: String,
    /// Search depth
    pub depth: usize,
    /// Which built-in strategy to run
    pub strategy: StrategyKind,
}

impl BotSpec {
    /// Creates a bot assignment
    pub fn new(name: impl Into<String>, depth: usize, strategy: StrategyKind) -> Self {
        BotSpec {
            name: name.into(),
            depth,
            strategy,
        }
    }

    /// Builds the bot this assignment describes
    pub fn build<B: CellBoard>(&self) -> Bot<B> {
        let strategy: Arc<dyn Strategy<B>> = match self.strategy {
            StrategyKind::Random => Arc::new(RandomStrategy::new()),
            StrategyKind::OwnedCells => Arc::new(SearchStrategy::new(OwnedCells)),
            StrategyKind::LevelSum => Arc::new(SearchStrategy::new(LevelSum)),
            StrategyKind::EnemyLevels => Arc::new(SearchStrategy::new(EnemyLevels)),
            StrategyKind::Weighted { own_weight } => {
                Arc::new(SearchStrategy::new(Weighted::new(own_weight)))
            }
        };
        Bot::from_arc(self.name.clone(), self.depth, strategy)
    }
}
