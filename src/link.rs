//! The future-turn tree
//!
//! Every point in the game reachable from the current position is a [`Link`]
//! stored in a [`LinkArena`] under a stable [`LinkId`]. Links are joined by
//! [`Next`] edges: the outcome of a turn ([`Trans`]) paired with the id of the
//! link that follows it. Rewriting the tree means replacing the link stored
//! under an id, or pointing a `Next` at a different id. Only the scheduler
//! does either, always while holding its lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{board::Board, executor::ComputationId, scheduler::Computation};

/// The recorded outcome of one turn
///
/// Holds the board after the move, the player order for the turn that
/// follows, and the transitions the move produced. Immutable once created.
pub struct Trans<B: Board> {
    board: B,
    order: Vec<B::Player>,
    transitions: Vec<B::Transition>,
}

impl<B: Board> Trans<B> {
    /// Wraps a starting position: no move was played to reach it
    pub fn initial(board: B, order: Vec<B::Player>) -> Self {
        Trans {
            board,
            order,
            transitions: Vec::new(),
        }
    }

    /// Plays `mv` for `player` on a copy of `board` and records the outcome
    pub fn simulate(board: &B, order: &[B::Player], player: B::Player, mv: &B::Move) -> Self {
        let mut board = board.clone();
        let transitions = board.apply_move(player, mv).collect();
        let order = board.rotated_order(order);
        Trans {
            board,
            order,
            transitions,
        }
    }

    /// Board after the move
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Order of play for the following turn, dead players removed
    pub fn order(&self) -> &[B::Player] {
        &self.order
    }

    /// Transitions produced by the move, in the order they happened
    pub fn transitions(&self) -> &[B::Transition] {
        &self.transitions
    }

    /// Player who moves next, if any
    pub fn current_player(&self) -> Option<B::Player> {
        self.order.first().copied()
    }

    /// True when at most one player is left to move
    pub fn is_final(&self) -> bool {
        self.order.len() <= 1
    }
}

impl<B: Board> fmt::Debug for Trans<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trans")
            .field("order", &self.order)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

/// Stable address of a link inside a [`LinkArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// An edge of the tree: a turn outcome and the link that follows it
#[derive(Debug)]
pub struct Next<B: Board> {
    /// Outcome of the turn leading here
    pub trans: Arc<Trans<B>>,

    /// What is known about the turn after it
    pub link: LinkId,
}

impl<B: Board> Clone for Next<B> {
    fn clone(&self) -> Self {
        Next {
            trans: Arc::clone(&self.trans),
            link: self.link,
        }
    }
}

/// A node of the future-turn tree
#[derive(Debug)]
pub enum Link<B: Board> {
    /// Root of the tree; its edge leads to the next turn
    Start(Next<B>),

    /// Nobody is left to move on this branch
    End,

    /// Not expanded yet
    Unknown {
        /// Distance from the position the tree was started at
        depth: usize,
    },

    /// A human moves here; one edge per legal move
    HumanChoice {
        /// The human to move
        player: B::Player,
        /// Legal moves and where each leads
        choices: Vec<(B::Move, Next<B>)>,
    },

    /// A search for this bot turn is running in the single active slot
    BotComputing {
        /// The bot to move
        player: B::Player,
        /// Distance from the start of the tree
        depth: usize,
        /// Identity of the running computation
        computation: ComputationId,
    },

    /// A search for this bot turn is waiting in the backlog
    BotScheduledComputing {
        /// The bot to move
        player: B::Player,
        /// Distance from the start of the tree
        depth: usize,
        /// The search to run once admitted
        computation: Computation<B>,
    },

    /// The bot's move is known
    BotComputed {
        /// The bot that moves
        player: B::Player,
        /// The move it chose
        mv: B::Move,
        /// Outcome of that move and what follows
        next: Next<B>,
    },
}

impl<B: Board> Link<B> {
    /// Ids of the links directly below this one
    pub fn children(&self) -> Vec<LinkId> {
        match self {
            Link::Start(next) | Link::BotComputed { next, .. } => vec![next.link],
            Link::HumanChoice { choices, .. } => {
                choices.iter().map(|(_, next)| next.link).collect()
            }
            Link::End
            | Link::Unknown { .. }
            | Link::BotComputing { .. }
            | Link::BotScheduledComputing { .. } => Vec::new(),
        }
    }

    /// Short name of the variant, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Link::Start(_) => "start",
            Link::End => "end",
            Link::Unknown { .. } => "unknown",
            Link::HumanChoice { .. } => "human-choice",
            Link::BotComputing { .. } => "bot-computing",
            Link::BotScheduledComputing { .. } => "bot-scheduled",
            Link::BotComputed { .. } => "bot-computed",
        }
    }

    /// A detached, read-only description of this link
    ///
    /// Returns `None` for the root.
    pub fn view(&self) -> Option<FocusView<B>> {
        let view = match self {
            Link::Start(_) => return None,
            Link::End => FocusView::End,
            Link::Unknown { depth } => FocusView::Unknown { depth: *depth },
            Link::HumanChoice { player, choices } => FocusView::HumanChoice {
                player: *player,
                moves: choices.iter().map(|(mv, _)| mv.clone()).collect(),
            },
            Link::BotComputing { player, depth, .. } => FocusView::BotComputing {
                player: *player,
                depth: *depth,
            },
            Link::BotScheduledComputing { player, depth, .. } => FocusView::BotScheduled {
                player: *player,
                depth: *depth,
            },
            Link::BotComputed { player, mv, .. } => FocusView::BotComputed {
                player: *player,
                mv: mv.clone(),
            },
        };
        Some(view)
    }
}

/// What is known about the very next turn
#[derive(Debug, Clone, PartialEq)]
pub enum FocusView<B: Board> {
    /// The game is over
    End,
    /// Not expanded yet
    Unknown { depth: usize },
    /// A human must pick one of `moves`
    HumanChoice {
        player: B::Player,
        moves: Vec<B::Move>,
    },
    /// The bot's search is running
    BotComputing { player: B::Player, depth: usize },
    /// The bot's search is queued
    BotScheduled { player: B::Player, depth: usize },
    /// The bot's move is known
    BotComputed { player: B::Player, mv: B::Move },
}

impl<B: Board> FocusView<B> {
    /// Player to move, if the turn has been expanded
    pub fn player(&self) -> Option<B::Player> {
        match self {
            FocusView::HumanChoice { player, .. }
            | FocusView::BotComputing { player, .. }
            | FocusView::BotScheduled { player, .. }
            | FocusView::BotComputed { player, .. } => Some(*player),
            FocusView::End | FocusView::Unknown { .. } => None,
        }
    }

    /// True for the three bot states
    pub fn is_bot(&self) -> bool {
        matches!(
            self,
            FocusView::BotComputing { .. }
                | FocusView::BotScheduled { .. }
                | FocusView::BotComputed { .. }
        )
    }

    /// True when a human must choose
    pub fn is_human(&self) -> bool {
        matches!(self, FocusView::HumanChoice { .. })
    }
}

/// Owner of every link in the tree
pub struct LinkArena<B: Board> {
    nodes: HashMap<LinkId, Link<B>>,
    next_id: u64,
}

impl<B: Board> LinkArena<B> {
    /// Creates an empty arena
    pub fn new() -> Self {
        LinkArena {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Stores `link` under a fresh id
    ///
    /// Ids are never reused, so a stale id can only miss.
    pub fn insert(&mut self, link: Link<B>) -> LinkId {
        let id = LinkId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, link);
        id
    }

    /// Returns the link stored under `id`
    pub fn get(&self, id: LinkId) -> Option<&Link<B>> {
        self.nodes.get(&id)
    }

    /// Returns true if `id` is still part of the tree
    pub fn contains(&self, id: LinkId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Rewrites the slot at `id`, returning what was there
    pub fn replace(&mut self, id: LinkId, link: Link<B>) -> Option<Link<B>> {
        self.nodes.insert(id, link)
    }

    /// Takes the link at `id` out of the arena without touching its children
    pub fn remove(&mut self, id: LinkId) -> Option<Link<B>> {
        self.nodes.remove(&id)
    }

    /// Removes `id` and everything below it, returning how many links went
    pub fn release(&mut self, id: LinkId) -> usize {
        let mut released = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(link) = self.nodes.remove(&id) {
                released += 1;
                stack.extend(link.children());
            }
        }
        released
    }

    /// Number of links in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no links
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<B: Board> Default for LinkArena<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the terminal leaves reachable from `id`
///
/// Human branch points add up their children, a computed bot turn passes
/// through to its single child, and every other link counts as one leaf.
pub fn compute_width<B: Board>(arena: &LinkArena<B>, id: LinkId) -> usize {
    match arena.get(id) {
        Some(Link::Start(next)) | Some(Link::BotComputed { next, .. }) => {
            compute_width(arena, next.link)
        }
        Some(Link::HumanChoice { choices, .. }) => choices
            .iter()
            .map(|(_, next)| compute_width(arena, next.link))
            .sum(),
        Some(Link::End)
        | Some(Link::Unknown { .. })
        | Some(Link::BotComputing { .. })
        | Some(Link::BotScheduledComputing { .. }) => 1,
        None => 0,
    }
}

/// Number of turns known ahead of `id` on its shortest open branch
///
/// Open leaves (unknown, queued or running) count as zero and every resolved
/// turn above them adds one. `End` is `None`: resolved, with nothing further
/// to wait for. A branch point whose children are all `None` is `None`.
pub fn compute_depth<B: Board>(arena: &LinkArena<B>, id: LinkId) -> Option<usize> {
    match arena.get(id) {
        Some(Link::Start(next)) => compute_depth(arena, next.link),
        Some(Link::BotComputed { next, .. }) => compute_depth(arena, next.link).map(|d| d + 1),
        Some(Link::HumanChoice { choices, .. }) => choices
            .iter()
            .filter_map(|(_, next)| compute_depth(arena, next.link))
            .min()
            .map(|d| d + 1),
        Some(Link::Unknown { .. })
        | Some(Link::BotComputing { .. })
        | Some(Link::BotScheduledComputing { .. }) => Some(0),
        Some(Link::End) | None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter(u32);

    impl Board for Counter {
        type Move = usize;
        type Player = usize;
        type Transition = u32;

        fn legal_moves(&self, _player: usize) -> Vec<usize> {
            vec![1, 2]
        }

        fn is_alive(&self, _player: usize) -> bool {
            true
        }

        fn apply_move(&mut self, _player: usize, mv: &usize) -> impl Iterator<Item = u32> {
            self.0 += *mv as u32;
            std::iter::once(self.0)
        }

        fn players(&self) -> Vec<usize> {
            vec![0, 1]
        }
    }

    fn next(arena: &mut LinkArena<Counter>, link: Link<Counter>) -> Next<Counter> {
        Next {
            trans: Arc::new(Trans::initial(Counter(0), vec![0, 1])),
            link: arena.insert(link),
        }
    }

    #[test]
    fn test_trans_simulate_rotates_order_and_records_transitions() {
        let trans = Trans::simulate(&Counter(3), &[0, 1, 2], 0, &2);
        assert_eq!(trans.board(), &Counter(5));
        assert_eq!(trans.order(), &[1, 2, 0]);
        assert_eq!(trans.transitions(), &[5]);
        assert_eq!(trans.current_player(), Some(1));
        assert!(!trans.is_final());
    }

    #[test]
    fn test_width_and_depth_of_mixed_tree() {
        let mut arena = LinkArena::new();
        let unknown = next(&mut arena, Link::Unknown { depth: 3 });
        let end = next(&mut arena, Link::End);
        let computed = next(
            &mut arena,
            Link::BotComputed {
                player: 1,
                mv: 1,
                next: unknown,
            },
        );
        let choice = next(
            &mut arena,
            Link::HumanChoice {
                player: 0,
                choices: vec![(1, computed), (2, end)],
            },
        );
        let root = arena.insert(Link::Start(choice));

        // One unknown leaf behind the bot move plus the end leaf
        assert_eq!(compute_width(&arena, root), 2);
        // human choice -> bot computed -> unknown
        assert_eq!(compute_depth(&arena, root), Some(2));
    }

    #[test]
    fn test_depth_of_finished_branches_is_none() {
        let mut arena = LinkArena::new();
        let a = next(&mut arena, Link::End);
        let b = next(&mut arena, Link::End);
        let choice = arena.insert(Link::HumanChoice {
            player: 0,
            choices: vec![(1, a), (2, b)],
        });
        assert_eq!(compute_depth(&arena, choice), None);
        assert_eq!(compute_width(&arena, choice), 2);
    }

    #[test]
    fn test_release_removes_whole_subtree() {
        let mut arena = LinkArena::new();
        let a = next(&mut arena, Link::Unknown { depth: 2 });
        let b = next(&mut arena, Link::End);
        let keep = arena.insert(Link::Unknown { depth: 1 });
        let choice = arena.insert(Link::HumanChoice {
            player: 0,
            choices: vec![(1, a), (2, b)],
        });

        assert_eq!(arena.release(choice), 3);
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(keep));
        assert!(!arena.contains(choice));
    }
}
