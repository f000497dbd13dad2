//! Traits defining the board collaborator.
//!
//! The scheduler and the search never look inside a board. They only ask for
//! legal moves, apply moves to private copies, rotate the player order and
//! check who is still alive. Evaluators additionally read per-cell ownership
//! through [`CellBoard`].

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for moves a player can make on a board
pub trait Move: Clone + Debug + PartialEq + Send + Sync + 'static {}

/// Trait for player identifiers
///
/// A game has a fixed, ordered cycle of these for its whole duration.
pub trait PlayerId: Copy + Debug + Eq + Hash + Send + Sync + 'static {}

impl PlayerId for usize {}
impl PlayerId for u8 {}
impl PlayerId for u32 {}
impl PlayerId for char {}

impl Move for usize {}
impl Move for u32 {}
impl Move for (usize, usize) {}

/// Trait defining the board interface consumed by the scheduler and the search
///
/// `Clone` must produce an independent deep copy: simulating on a copy never
/// affects the original.
pub trait Board: Clone + Send + Sync + 'static {
    /// The type of moves that can be made on this board
    type Move: Move;

    /// The type of player identifiers
    type Player: PlayerId;

    /// One observable change produced while a move is applied, e.g. one
    /// cascade step
    type Transition: Clone + Debug + Send + Sync + 'static;

    /// Returns every legal move for `player`
    fn legal_moves(&self, player: Self::Player) -> Vec<Self::Move>;

    /// Returns the legal moves for `player` with board-equivalent moves removed
    ///
    /// The search only explores these. The default keeps every legal move.
    fn distinct_legal_moves(&self, player: Self::Player) -> Vec<Self::Move> {
        self.legal_moves(player)
    }

    /// Returns true while `player` is still in the game
    fn is_alive(&self, player: Self::Player) -> bool;

    /// Applies `mv` for `player` in place
    ///
    /// The returned sequence is lazy, finite and can only be walked once. It
    /// must be drained for the board to reach its final state.
    fn apply_move(
        &mut self,
        player: Self::Player,
        mv: &Self::Move,
    ) -> impl Iterator<Item = Self::Transition>;

    /// Returns every player taking part in the game
    fn players(&self) -> Vec<Self::Player>;

    /// Returns the order for the next turn
    ///
    /// The default rotates `order` left by one and drops dead players.
    fn rotated_order(&self, order: &[Self::Player]) -> Vec<Self::Player> {
        order
            .iter()
            .skip(1)
            .chain(order.first())
            .copied()
            .filter(|&player| self.is_alive(player))
            .collect()
    }
}

/// Ownership and level of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView<P> {
    /// Player owning the cell, if any
    pub owner: Option<P>,

    /// Number of charges stacked on the cell
    pub level: u32,
}

/// Boards exposing per-cell ownership, used by the built-in evaluators
pub trait CellBoard: Board {
    /// Returns a view of every cell on the board
    fn cells(&self) -> impl Iterator<Item = CellView<Self::Player>>;
}
