//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cascade_turns::{Board, CancelToken, Strategy, TurnError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

pub use cascade_turns::grid::{Grid, Step};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A scripted game: legal moves, scores and deaths are looked up by the
/// history of moves played so far
#[derive(Debug, Default, PartialEq)]
pub struct Script {
    players: Vec<usize>,
    moves: HashMap<Vec<usize>, Vec<usize>>,
    scores: HashMap<Vec<usize>, f64>,
    dead: HashMap<Vec<usize>, Vec<usize>>,
    equivalent: HashMap<usize, usize>,
}

impl Script {
    pub fn new(players: &[usize]) -> Self {
        Script {
            players: players.to_vec(),
            ..Default::default()
        }
    }

    pub fn moves(mut self, history: &[usize], moves: &[usize]) -> Self {
        self.moves.insert(history.to_vec(), moves.to_vec());
        self
    }

    pub fn score(mut self, history: &[usize], score: f64) -> Self {
        self.scores.insert(history.to_vec(), score);
        self
    }

    pub fn dead(mut self, history: &[usize], players: &[usize]) -> Self {
        self.dead.insert(history.to_vec(), players.to_vec());
        self
    }

    /// Declares `mv` board-equivalent to `canonical`
    pub fn equivalent(mut self, mv: usize, canonical: usize) -> Self {
        self.equivalent.insert(mv, canonical);
        self
    }

    pub fn board(self) -> ScriptBoard {
        ScriptBoard {
            history: Vec::new(),
            script: Arc::new(self),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptBoard {
    history: Vec<usize>,
    script: Arc<Script>,
}

impl ScriptBoard {
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn score(&self) -> f64 {
        self.script.scores.get(&self.history).copied().unwrap_or(0.0)
    }
}

impl Board for ScriptBoard {
    type Move = usize;
    type Player = usize;
    type Transition = usize;

    fn legal_moves(&self, player: usize) -> Vec<usize> {
        if !self.is_alive(player) {
            return Vec::new();
        }
        self.script
            .moves
            .get(&self.history)
            .cloned()
            .unwrap_or_default()
    }

    fn distinct_legal_moves(&self, player: usize) -> Vec<usize> {
        self.legal_moves(player)
            .into_iter()
            .filter(|mv| !self.script.equivalent.contains_key(mv))
            .collect()
    }

    fn is_alive(&self, player: usize) -> bool {
        self.script
            .dead
            .get(&self.history)
            .map_or(true, |dead| !dead.contains(&player))
    }

    fn apply_move(&mut self, _player: usize, mv: &usize) -> impl Iterator<Item = usize> {
        self.history.push(*mv);
        std::iter::once(*mv)
    }

    fn players(&self) -> Vec<usize> {
        self.script.players.clone()
    }
}

/// Handle used by a test to release or observe a [`GateStrategy`]
#[derive(Clone)]
pub struct Gate {
    release: Sender<()>,
    pub started: Arc<AtomicUsize>,
    pub cancelled: Arc<AtomicUsize>,
}

impl Gate {
    /// Lets one blocked search finish
    pub fn open(&self) {
        self.release.send(()).ok();
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Spins until `count` searches have started
    pub fn wait_started(&self, count: usize) -> bool {
        wait_until(|| self.started() >= count)
    }

    /// Spins until `count` searches have observed cancellation
    pub fn wait_cancelled(&self, count: usize) -> bool {
        wait_until(|| self.cancelled() >= count)
    }
}

/// A strategy that blocks until its gate is opened, then plays the first
/// legal move
pub struct GateStrategy {
    gate: Receiver<()>,
    started: Arc<AtomicUsize>,
    cancelled: Arc<AtomicUsize>,
}

impl GateStrategy {
    pub fn new() -> (Self, Gate) {
        let (release, gate) = crossbeam_channel::unbounded();
        let started = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicUsize::new(0));
        (
            GateStrategy {
                gate,
                started: Arc::clone(&started),
                cancelled: Arc::clone(&cancelled),
            },
            Gate {
                release,
                started,
                cancelled,
            },
        )
    }
}

impl<B: Board> Strategy<B> for GateStrategy {
    fn choose_move(
        &self,
        board: &B,
        player: B::Player,
        _order: &[B::Player],
        _depth: usize,
        cancel: &CancelToken,
    ) -> cascade_turns::Result<B::Move> {
        self.started.fetch_add(1, Ordering::SeqCst);
        loop {
            if cancel.is_cancelled() {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
                return Err(TurnError::Cancelled);
            }
            match self.gate.recv_timeout(Duration::from_millis(2)) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
        board
            .legal_moves(player)
            .into_iter()
            .next()
            .ok_or(TurnError::NoLegalMoves)
    }
}

/// Polls `condition` for up to five seconds
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..2500 {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}
