//! The game orchestrator
//!
//! [`Game`] is the state machine a caller drives: it knows whose turn it is,
//! forwards human moves and bot requests to the scheduler, and applies the
//! recorded outcome of each turn to the live board.
//!
//! Applying an outcome means adopting the board the scheduler recorded for
//! it, which is the live board with the move's transitions already played.
//! The transitions themselves reach the caller through the returned
//! [`Trans`] and every [`TurnEvent`], so nothing replays them a second time.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::{
    board::{Board, CellBoard},
    config::SchedulerConfig,
    link::{FocusView, Trans},
    observer::{Subscription, TurnObservers},
    player::{BotSpec, Player},
    scheduler::{BotTurn, BotTurnHandle, LinkedTurns},
    Result, TurnError,
};

/// Published after every applied turn
#[derive(Debug)]
pub struct TurnEvent<B: Board> {
    /// Player who moved
    pub player: B::Player,
    /// The move played
    pub mv: B::Move,
    /// Outcome of the move, including its transitions
    pub trans: Arc<Trans<B>>,
}

/// Persisted state a game can be rebuilt from
///
/// Players in `order` without an entry in `bots` are human.
#[derive(Debug, Clone)]
pub struct GameSnapshot<B: Board> {
    /// Board position
    pub board: B,
    /// Bot assignments
    pub bots: HashMap<B::Player, BotSpec>,
    /// Order of play, next mover first
    pub order: Vec<B::Player>,
}

/// One running game: the live board, its players and the scheduler
pub struct Game<B: Board> {
    board: B,
    order: Vec<B::Player>,
    players: HashMap<B::Player, Player<B>>,
    alive: HashMap<B::Player, bool>,
    turns: LinkedTurns<B>,
    turns_applied: usize,
    observers: TurnObservers<TurnEvent<B>>,
}

impl<B: Board> Game<B> {
    /// Creates a game with the default scheduler configuration
    pub fn new(
        board: B,
        order: Vec<B::Player>,
        players: HashMap<B::Player, Player<B>>,
    ) -> Result<Self> {
        Self::with_config(board, order, players, SchedulerConfig::default())
    }

    /// Creates a game and starts speculating on bot turns
    pub fn with_config(
        board: B,
        order: Vec<B::Player>,
        players: HashMap<B::Player, Player<B>>,
        config: SchedulerConfig,
    ) -> Result<Self> {
        let turns =
            LinkedTurns::with_config(board.clone(), order.clone(), players.clone(), config)?;
        let alive = liveness(&board, &players);
        Ok(Game {
            board,
            order,
            players,
            alive,
            turns,
            turns_applied: 0,
            observers: TurnObservers::new(),
        })
    }

    /// The player to move: the first live player in the order
    pub fn current_player(&self) -> Option<B::Player> {
        self.order
            .iter()
            .copied()
            .find(|player| self.alive.get(player).copied().unwrap_or(false))
    }

    /// True when the current player is a human
    pub fn is_human_turn(&self) -> bool {
        !self.is_game_over() && self.current_kind().is_some_and(Player::is_human)
    }

    /// True when the current player is a bot
    pub fn is_bot_turn(&self) -> bool {
        !self.is_game_over() && self.current_kind().is_some_and(Player::is_bot)
    }

    /// Legal moves of the current player
    pub fn legal_moves(&self) -> Vec<B::Move> {
        match self.current_player() {
            Some(player) if !self.is_game_over() => self.board.legal_moves(player),
            _ => Vec::new(),
        }
    }

    /// True once at most one player is left
    pub fn is_game_over(&self) -> bool {
        self.order
            .iter()
            .filter(|player| self.alive.get(player).copied().unwrap_or(false))
            .count()
            <= 1
    }

    /// Whether `player` is still in the game
    pub fn is_alive(&self, player: B::Player) -> bool {
        self.alive.get(&player).copied().unwrap_or(false)
    }

    /// The live board
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Order of play, next mover first
    pub fn order(&self) -> &[B::Player] {
        &self.order
    }

    /// Turns applied so far
    pub fn turns_applied(&self) -> usize {
        self.turns_applied
    }

    /// What the scheduler knows about the next turn
    pub fn focus(&self) -> FocusView<B> {
        self.turns.focus()
    }

    /// The scheduler behind this game
    pub fn scheduler(&self) -> &LinkedTurns<B> {
        &self.turns
    }

    /// Plays `mv` for the current human player
    ///
    /// Returns the outcome of the move; its transitions describe the cascade
    /// for presentation.
    pub fn apply_human_turn(&mut self, mv: &B::Move) -> Result<Arc<Trans<B>>> {
        if !self.is_human_turn() {
            return Err(TurnError::NotHumanTurn);
        }
        let player = self.current_player().ok_or(TurnError::NotHumanTurn)?;
        let trans = self.turns.given_human_turn(mv)?;
        self.adopt(player, mv.clone(), Arc::clone(&trans));
        Ok(trans)
    }

    /// Asks the scheduler for the current bot's move without blocking
    ///
    /// Pass the resolved turn to [`complete_bot_turn`](Self::complete_bot_turn).
    pub fn request_bot_turn(&self) -> Result<BotTurnHandle<B>> {
        if !self.is_bot_turn() {
            return Err(TurnError::NotBotTurn);
        }
        self.turns.request_bot_turn()
    }

    /// Applies a bot turn obtained through [`request_bot_turn`](Self::request_bot_turn)
    ///
    /// Each turn is applied once; a turn for any other point of the game is
    /// rejected. Until this succeeds, every request answers with the same
    /// turn, so a dropped handle never leaves the game behind the scheduler.
    pub fn complete_bot_turn(&mut self, turn: &BotTurn<B>) -> Result<()> {
        if !self.is_bot_turn() || self.current_player() != Some(turn.player) {
            return Err(TurnError::NotBotTurn);
        }
        if turn.turn != self.turns_applied + 1 {
            return Err(TurnError::ComputationMismatch {
                expected: format!("turn {}", self.turns_applied + 1),
                found: format!("turn {}", turn.turn),
            });
        }
        self.turns.acknowledge_bot_turn(turn)?;
        self.adopt(turn.player, turn.mv.clone(), Arc::clone(&turn.trans));
        Ok(())
    }

    /// Plays the current bot's move, blocking until its search is done
    pub fn apply_bot_turn(&mut self) -> Result<BotTurn<B>> {
        let turn = self.request_bot_turn()?.wait()?;
        self.complete_bot_turn(&turn)?;
        Ok(turn)
    }

    /// Calls `callback` after every applied turn for as long as the returned
    /// subscription lives
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TurnEvent<B>) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    fn current_kind(&self) -> Option<&Player<B>> {
        self.current_player()
            .and_then(|player| self.players.get(&player))
    }

    /// Moves the live board to the outcome `trans` recorded for the move
    fn adopt(&mut self, player: B::Player, mv: B::Move, trans: Arc<Trans<B>>) {
        self.board = trans.board().clone();
        self.order = trans.order().to_vec();
        self.alive = liveness(&self.board, &self.players);
        self.turns_applied += 1;
        info!(
            "turn {}: {:?} played {:?} ({} transitions)",
            self.turns_applied,
            player,
            mv,
            trans.transitions().len()
        );
        self.observers.notify(&TurnEvent { player, mv, trans });
    }
}

impl<B: CellBoard> Game<B> {
    /// Rebuilds a game from persisted state
    pub fn from_snapshot(snapshot: GameSnapshot<B>, config: SchedulerConfig) -> Result<Self> {
        let GameSnapshot { board, bots, order } = snapshot;
        let players = order
            .iter()
            .map(|&player| {
                let seat = match bots.get(&player) {
                    Some(spec) => Player::Bot(spec.build()),
                    None => Player::Human,
                };
                (player, seat)
            })
            .collect();
        Self::with_config(board, order, players, config)
    }
}

fn liveness<B: Board>(
    board: &B,
    players: &HashMap<B::Player, Player<B>>,
) -> HashMap<B::Player, bool> {
    players
        .keys()
        .map(|&player| (player, board.is_alive(player)))
        .collect()
}
