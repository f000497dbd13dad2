//! The speculative turn scheduler
//!
//! [`LinkedTurns`] owns the future-turn tree. While the caller waits on a
//! human, it keeps expanding the shallowest unexplored branches and feeds bot
//! turns to the single background search slot, so that by the time a bot is
//! actually to move its answer is usually already recorded.
//!
//! All tree mutation happens under one lock. The lock is never held while
//! waiting for a search; callers block on a [`BotTurnHandle`] instead.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::{
    board::Board,
    cancel::CancelToken,
    config::SchedulerConfig,
    executor::{spawn_worker, Admission, Admit, ComputationId, DepthQueue, Job, JobOutcome},
    link::{compute_depth, compute_width, FocusView, Link, LinkArena, LinkId, Next, Trans},
    player::{Bot, Player},
    stats::SchedulerStatistics,
    Result, TurnError,
};

/// One bot search, independent of where it sits in the tree
pub struct Computation<B: Board> {
    bot: Bot<B>,
    player: B::Player,
    board: B,
    order: Vec<B::Player>,
    depth: usize,
}

impl<B: Board> Computation<B> {
    /// Describes a search for `player`, the head of `order`, at tree `depth`
    pub fn new(
        bot: Bot<B>,
        player: B::Player,
        board: B,
        order: Vec<B::Player>,
        depth: usize,
    ) -> Self {
        Computation {
            bot,
            player,
            board,
            order,
            depth,
        }
    }

    /// The bot to move
    pub fn player(&self) -> B::Player {
        self.player
    }

    /// Depth of the branch in the tree
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The bot running the search
    pub fn bot(&self) -> &Bot<B> {
        &self.bot
    }

    /// Runs the search and records the outcome of the chosen move
    pub fn run(&self, cancel: &CancelToken) -> Result<(B::Move, Trans<B>)> {
        let mv = self
            .bot
            .choose_move(&self.board, self.player, &self.order, cancel)?;
        cancel.check()?;
        let trans = Trans::simulate(&self.board, &self.order, self.player, &mv);
        Ok((mv, trans))
    }
}

impl<B: Board> Clone for Computation<B> {
    fn clone(&self) -> Self {
        Computation {
            bot: self.bot.clone(),
            player: self.player,
            board: self.board.clone(),
            order: self.order.clone(),
            depth: self.depth,
        }
    }
}

impl<B: Board> fmt::Debug for Computation<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation")
            .field("bot", &self.bot)
            .field("player", &self.player)
            .field("order", &self.order)
            .field("depth", &self.depth)
            .finish()
    }
}

/// A bot move that has been played through the scheduler
#[derive(Debug)]
pub struct BotTurn<B: Board> {
    /// The bot that moved
    pub player: B::Player,
    /// The move it chose
    pub mv: B::Move,
    /// Outcome of the move
    pub trans: Arc<Trans<B>>,
    /// Number of turns traversed once this one was played
    pub turn: usize,
}

impl<B: Board> Clone for BotTurn<B> {
    fn clone(&self) -> Self {
        BotTurn {
            player: self.player,
            mv: self.mv.clone(),
            trans: Arc::clone(&self.trans),
            turn: self.turn,
        }
    }
}

enum HandleState<B: Board> {
    Ready(BotTurn<B>),
    Pending(Receiver<Result<BotTurn<B>>>),
}

/// Answer to [`LinkedTurns::request_bot_turn`]
///
/// Either already resolved, or resolving once the running search finishes.
/// Wait on it outside any lock.
pub struct BotTurnHandle<B: Board> {
    state: HandleState<B>,
}

impl<B: Board> BotTurnHandle<B> {
    fn ready(turn: BotTurn<B>) -> Self {
        BotTurnHandle {
            state: HandleState::Ready(turn),
        }
    }

    fn pending(receiver: Receiver<Result<BotTurn<B>>>) -> Self {
        BotTurnHandle {
            state: HandleState::Pending(receiver),
        }
    }

    /// True if [`wait`](Self::wait) would return without blocking
    pub fn is_ready(&self) -> bool {
        match &self.state {
            HandleState::Ready(_) => true,
            HandleState::Pending(receiver) => !receiver.is_empty(),
        }
    }

    /// Polls for the result without blocking
    pub fn try_take(&mut self) -> Option<Result<BotTurn<B>>> {
        let received = match &self.state {
            HandleState::Ready(turn) => return Some(Ok(turn.clone())),
            HandleState::Pending(receiver) => match receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(Err(TurnError::Cancelled)),
            },
        };
        if let Ok(turn) = &received {
            self.state = HandleState::Ready(turn.clone());
        }
        Some(received)
    }

    /// Blocks until the bot's move is known
    ///
    /// Resolves to [`TurnError::Cancelled`] if the scheduler is dropped first.
    pub fn wait(self) -> Result<BotTurn<B>> {
        match self.state {
            HandleState::Ready(turn) => Ok(turn),
            HandleState::Pending(receiver) => receiver.recv().map_err(|_| TurnError::Cancelled)?,
        }
    }
}

impl<B: Board> fmt::Debug for BotTurnHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotTurnHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// A branch waiting for discovery, with the outcome that leads to it
struct UnknownBranch<B: Board> {
    link: LinkId,
    trans: Arc<Trans<B>>,
}

type Waiter<B> = Sender<Result<BotTurn<B>>>;

/// Everything guarded by the scheduler lock
struct TreeState<B: Board> {
    arena: LinkArena<B>,
    root: LinkId,
    unknowns: DepthQueue<UnknownBranch<B>>,
    admission: Admission,
    waiters: HashMap<LinkId, Vec<Waiter<B>>>,
    /// Last bot turn played, until the caller acknowledges it
    delivered: Option<BotTurn<B>>,
    players: HashMap<B::Player, Player<B>>,
    max_width: usize,
    stats: SchedulerStatistics,
}

impl<B: Board> TreeState<B> {
    fn start(&self) -> &Next<B> {
        match self.arena.get(self.root) {
            Some(Link::Start(next)) => next,
            _ => unreachable!("the root link is always Start"),
        }
    }

    fn focus(&self) -> LinkId {
        self.start().link
    }

    fn advance_start(&mut self, next: Next<B>) {
        self.arena.replace(self.root, Link::Start(next));
        self.stats.traversed_turns += 1;
    }

    fn width(&self) -> usize {
        compute_width(&self.arena, self.focus())
    }

    /// Mints the link following `trans`: `End` if at most one player is
    /// left, otherwise a fresh `Unknown` registered for discovery
    fn open_branch(&mut self, trans: Arc<Trans<B>>, depth: usize) -> Next<B> {
        let link = if trans.is_final() {
            self.arena.insert(Link::End)
        } else {
            let link = self.arena.insert(Link::Unknown { depth });
            self.unknowns.push(
                depth,
                UnknownBranch {
                    link,
                    trans: Arc::clone(&trans),
                },
            );
            link
        };
        Next { trans, link }
    }

    fn discover_unknowns(&mut self, jobs: &Sender<Job<B>>) -> Result<()> {
        loop {
            let width = self.width();
            self.stats.peak_width = self.stats.peak_width.max(width);
            // The next turn itself is always expanded, whatever the width
            let focus_open = matches!(self.arena.get(self.focus()), Some(Link::Unknown { .. }));
            if width >= self.max_width && !focus_open {
                if width > self.max_width {
                    debug!("width {} overshoots soft maximum {}", width, self.max_width);
                }
                return Ok(());
            }
            let Some((depth, branch)) = self.unknowns.pop() else {
                return Ok(());
            };
            if !matches!(self.arena.get(branch.link), Some(Link::Unknown { .. })) {
                continue;
            }
            self.expand(jobs, depth, branch)?;
        }
    }

    fn expand(
        &mut self,
        jobs: &Sender<Job<B>>,
        depth: usize,
        branch: UnknownBranch<B>,
    ) -> Result<()> {
        let UnknownBranch { link, trans } = branch;
        let Some(mover) = trans.current_player() else {
            self.arena.replace(link, Link::End);
            return Ok(());
        };

        match self.players.get(&mover) {
            Some(Player::Human) => {
                let moves = trans.board().legal_moves(mover);
                if moves.is_empty() {
                    warn!("human {:?} has no legal move at depth {}", mover, depth);
                }
                let mut choices = Vec::with_capacity(moves.len());
                for mv in moves {
                    let outcome = Trans::simulate(trans.board(), trans.order(), mover, &mv);
                    let next = self.open_branch(Arc::new(outcome), depth + 1);
                    choices.push((mv, next));
                }
                debug!(
                    "{} expanded into {} choices for {:?} at depth {}",
                    link,
                    choices.len(),
                    mover,
                    depth
                );
                self.arena.replace(
                    link,
                    Link::HumanChoice {
                        player: mover,
                        choices,
                    },
                );
                self.stats.expansions += 1;
                Ok(())
            }
            Some(Player::Bot(bot)) => {
                let computation = Computation::new(
                    bot.clone(),
                    mover,
                    trans.board().clone(),
                    trans.order().to_vec(),
                    depth,
                );
                self.schedule_computation(jobs, link, computation)
            }
            None => Err(TurnError::UnknownPlayer(format!("{:?}", mover))),
        }
    }

    fn schedule_computation(
        &mut self,
        jobs: &Sender<Job<B>>,
        link: LinkId,
        computation: Computation<B>,
    ) -> Result<()> {
        match self.admission.submit(link, computation.depth()) {
            Admit::Launch(id, token) => self.launch(jobs, link, id, token, computation),
            Admit::Queued => {
                debug!(
                    "{} queued for {:?} at depth {}",
                    link,
                    computation.player(),
                    computation.depth()
                );
                self.stats.computations_queued += 1;
                self.arena.replace(
                    link,
                    Link::BotScheduledComputing {
                        player: computation.player(),
                        depth: computation.depth(),
                        computation,
                    },
                );
                Ok(())
            }
        }
    }

    fn launch(
        &mut self,
        jobs: &Sender<Job<B>>,
        link: LinkId,
        id: ComputationId,
        token: CancelToken,
        computation: Computation<B>,
    ) -> Result<()> {
        info!(
            "launching {} for {:?} ({}) at depth {}",
            id,
            computation.player(),
            computation.bot().name(),
            computation.depth()
        );
        self.arena.replace(
            link,
            Link::BotComputing {
                player: computation.player(),
                depth: computation.depth(),
                computation: id,
            },
        );
        self.stats.computations_launched += 1;
        jobs.send(Job {
            id,
            link,
            computation,
            token,
        })
        .map_err(|_| TurnError::Worker("search worker has stopped".to_string()))
    }

    /// Promotes the shallowest queued search into a free slot, or keeps the
    /// backlog populated by discovering more of the tree
    fn dequeue_step(&mut self, jobs: &Sender<Job<B>>) -> Result<()> {
        while self.admission.is_idle() {
            let Some(link) = self.admission.pop_queued() else {
                return self.discover_unknowns(jobs);
            };
            let computation = match self.arena.get(link) {
                Some(Link::BotScheduledComputing { computation, .. }) => computation.clone(),
                _ => continue,
            };
            let (id, token) = self.admission.activate(link);
            return self.launch(jobs, link, id, token, computation);
        }
        Ok(())
    }

    fn complete(&mut self, jobs: &Sender<Job<B>>, outcome: JobOutcome<B>) -> Result<()> {
        let JobOutcome { id, link, result } = outcome;
        let Some(slot_link) = self.admission.complete(id) else {
            debug!("discarding stale result of {}", id);
            self.stats.stale_results_discarded += 1;
            return Ok(());
        };

        let branch = match self.arena.get(slot_link) {
            Some(Link::BotComputing {
                player,
                depth,
                computation,
            }) if *computation == id && slot_link == link => Some((*player, *depth)),
            _ => None,
        };
        let Some((player, depth)) = branch else {
            error!("{} finished for {} but the slot held {}", id, link, slot_link);
            self.dequeue_step(jobs)?;
            return Err(TurnError::ComputationMismatch {
                expected: slot_link.to_string(),
                found: link.to_string(),
            });
        };

        match result {
            Ok((mv, trans)) => {
                info!("{} chose {:?} for {:?}", id, mv, player);
                let next = self.open_branch(Arc::new(trans), depth + 1);
                self.arena.replace(link, Link::BotComputed { player, mv, next });
                self.stats.computations_completed += 1;
                if let Some(waiters) = self.waiters.remove(&link) {
                    let turn = self.take_computed(link);
                    for waiter in waiters {
                        waiter.send(turn.clone()).ok();
                    }
                }
            }
            Err(err) => {
                error!("{} for {:?} failed: {}", id, player, err);
                self.arena.replace(link, Link::End);
                for waiter in self.waiters.remove(&link).into_iter().flatten() {
                    waiter.send(Err(err.clone())).ok();
                }
            }
        }
        self.dequeue_step(jobs)
    }

    /// Plays the computed bot turn at the focus, moving the start past it
    fn take_computed(&mut self, link: LinkId) -> Result<BotTurn<B>> {
        if link != self.focus() {
            return Err(TurnError::NotBotTurn);
        }
        match self.arena.remove(link) {
            Some(Link::BotComputed { player, mv, next }) => {
                let trans = Arc::clone(&next.trans);
                self.advance_start(next);
                info!("{:?} plays {:?}", player, mv);
                let turn = BotTurn {
                    player,
                    mv,
                    trans,
                    turn: self.stats.traversed_turns,
                };
                self.delivered = Some(turn.clone());
                Ok(turn)
            }
            Some(other) => {
                self.arena.replace(link, other);
                Err(TurnError::NotBotTurn)
            }
            None => Err(TurnError::NotBotTurn),
        }
    }

    fn request_bot_turn(&mut self, jobs: &Sender<Job<B>>) -> Result<BotTurnHandle<B>> {
        if let Some(turn) = &self.delivered {
            return Ok(BotTurnHandle::ready(turn.clone()));
        }
        let focus = self.focus();
        match self.arena.get(focus) {
            Some(Link::BotComputed { .. }) => {
                let turn = self.take_computed(focus)?;
                self.discover_unknowns(jobs)?;
                Ok(BotTurnHandle::ready(turn))
            }
            Some(Link::BotComputing { .. }) | Some(Link::BotScheduledComputing { .. }) => {
                let (sender, receiver) = crossbeam_channel::bounded(1);
                self.waiters.entry(focus).or_default().push(sender);
                Ok(BotTurnHandle::pending(receiver))
            }
            Some(Link::Start(_))
            | Some(Link::End)
            | Some(Link::Unknown { .. })
            | Some(Link::HumanChoice { .. })
            | None => Err(TurnError::NotBotTurn),
        }
    }

    fn acknowledge_bot_turn(&mut self, turn: &BotTurn<B>) -> Result<()> {
        match self.delivered.as_ref().map(|delivered| delivered.turn) {
            Some(expected) if expected == turn.turn => {
                self.delivered = None;
                Ok(())
            }
            Some(expected) => Err(TurnError::ComputationMismatch {
                expected: format!("bot turn {}", expected),
                found: format!("bot turn {}", turn.turn),
            }),
            None => Err(TurnError::ComputationMismatch {
                expected: "no outstanding bot turn".to_string(),
                found: format!("bot turn {}", turn.turn),
            }),
        }
    }

    fn given_human_turn(
        &mut self,
        jobs: &Sender<Job<B>>,
        mv: &B::Move,
    ) -> Result<Arc<Trans<B>>> {
        let focus = self.focus();
        let index = match self.arena.get(focus) {
            Some(Link::HumanChoice { choices, .. }) => choices
                .iter()
                .position(|(choice, _)| choice == mv)
                .ok_or_else(|| TurnError::IllegalMove(format!("{:?}", mv)))?,
            _ => return Err(TurnError::NotHumanTurn),
        };
        let Some(Link::HumanChoice { player, mut choices }) = self.arena.remove(focus) else {
            unreachable!("focus was checked to be a human choice");
        };

        // A human move follows, so the previous bot turn was consumed
        if let Some(turn) = self.delivered.take() {
            debug!("bot turn {} superseded by a human move", turn.turn);
        }

        let (_, chosen) = choices.swap_remove(index);
        let trans = Arc::clone(&chosen.trans);
        self.advance_start(chosen);
        info!("{:?} plays {:?}", player, mv);

        for (_, sibling) in choices {
            self.cancel_branch(sibling.link)?;
        }
        let arena = &self.arena;
        self.unknowns.retain(|branch| arena.contains(branch.link));

        if self.admission.is_idle() {
            self.dequeue_step(jobs)?;
        }
        self.discover_unknowns(jobs)?;
        Ok(trans)
    }

    /// Stops every search under `link`, then drops the branch from the tree
    fn cancel_branch(&mut self, link: LinkId) -> Result<()> {
        self.stop_computations(link)?;
        self.arena.release(link);
        Ok(())
    }

    /// Turns every queued or running search under `link` back into an
    /// `Unknown` at the same depth
    fn stop_computations(&mut self, link: LinkId) -> Result<()> {
        let children = match self.arena.get(link) {
            Some(Link::BotScheduledComputing { depth, .. }) => {
                let depth = *depth;
                self.admission.dequeue(link);
                self.arena.replace(link, Link::Unknown { depth });
                self.waiters.remove(&link);
                self.stats.backlog_dropped += 1;
                Vec::new()
            }
            Some(Link::BotComputing {
                depth, computation, ..
            }) => {
                let (depth, id) = (*depth, *computation);
                self.admission.cancel(id)?;
                self.arena.replace(link, Link::Unknown { depth });
                self.waiters.remove(&link);
                self.stats.computations_cancelled += 1;
                Vec::new()
            }
            Some(other) => other.children(),
            None => Vec::new(),
        };
        for child in children {
            self.stop_computations(child)?;
        }
        Ok(())
    }
}

struct Shared<B: Board> {
    state: Mutex<TreeState<B>>,
    jobs: Sender<Job<B>>,
}

impl<B: Board> Shared<B> {
    fn on_complete(&self, outcome: JobOutcome<B>) {
        let mut state = self.state.lock();
        if let Err(err) = state.complete(&self.jobs, outcome) {
            error!("failed to record search result: {}", err);
        }
    }
}

/// The speculative turn scheduler
///
/// Owns the future-turn tree for one game and the single background search
/// slot. See the [module documentation](self) for the overall flow.
pub struct LinkedTurns<B: Board> {
    shared: Arc<Shared<B>>,
}

impl<B: Board> LinkedTurns<B> {
    /// Creates a scheduler with the default configuration
    pub fn new(
        board: B,
        order: Vec<B::Player>,
        players: HashMap<B::Player, Player<B>>,
    ) -> Result<Self> {
        Self::with_config(board, order, players, SchedulerConfig::default())
    }

    /// Creates a scheduler and starts discovering the tree
    ///
    /// Fails on an empty `order` or a player in `order` without an entry in
    /// `players`. With a single player left the tree is just `End`.
    pub fn with_config(
        board: B,
        order: Vec<B::Player>,
        players: HashMap<B::Player, Player<B>>,
        config: SchedulerConfig,
    ) -> Result<Self> {
        config.validate()?;
        if order.is_empty() {
            return Err(TurnError::EmptyOrder);
        }
        if let Some(missing) = order.iter().find(|player| !players.contains_key(player)) {
            return Err(TurnError::UnknownPlayer(format!("{:?}", missing)));
        }

        let single = order.len() == 1;
        let trans = Arc::new(Trans::initial(board, order));
        let mut arena = LinkArena::new();
        let mut unknowns = DepthQueue::new();
        let focus = if single {
            arena.insert(Link::End)
        } else {
            let link = arena.insert(Link::Unknown { depth: 1 });
            unknowns.push(
                1,
                UnknownBranch {
                    link,
                    trans: Arc::clone(&trans),
                },
            );
            link
        };
        let root = arena.insert(Link::Start(Next { trans, link: focus }));

        let state = TreeState {
            arena,
            root,
            unknowns,
            admission: Admission::new(),
            waiters: HashMap::new(),
            delivered: None,
            players,
            max_width: config.max_width,
            stats: SchedulerStatistics::new(),
        };

        let (jobs, queue) = crossbeam_channel::unbounded();
        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            jobs,
        });

        let weak: Weak<Shared<B>> = Arc::downgrade(&shared);
        spawn_worker(&config.worker_name, queue, move |outcome| match weak.upgrade() {
            Some(shared) => {
                shared.on_complete(outcome);
                true
            }
            None => false,
        })?;

        let turns = LinkedTurns { shared };
        if !single {
            turns.discover_unknowns()?;
        }
        Ok(turns)
    }

    /// Expands unexplored branches, shallowest first, until nothing is left
    /// to expand or the width reaches its soft maximum
    pub fn discover_unknowns(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        state.discover_unknowns(&self.shared.jobs)
    }

    /// Plays the human move `mv` at the focus
    ///
    /// Every sibling branch is cancelled before this returns: queued searches
    /// leave the backlog and a running one is signalled. Returns the outcome
    /// of the chosen move.
    pub fn given_human_turn(&self, mv: &B::Move) -> Result<Arc<Trans<B>>> {
        let mut state = self.shared.state.lock();
        state.given_human_turn(&self.shared.jobs, mv)
    }

    /// Asks for the bot move at the focus
    ///
    /// A computed move is played at once and the handle is ready. Otherwise
    /// the handle resolves when the search finishes, at which point the move
    /// is played. Repeated requests while the search runs share its result
    /// and never start another search.
    ///
    /// A played bot turn stays outstanding until it is passed to
    /// [`acknowledge_bot_turn`](Self::acknowledge_bot_turn); until then every
    /// request answers with that same turn, even if earlier handles were
    /// dropped unread.
    pub fn request_bot_turn(&self) -> Result<BotTurnHandle<B>> {
        let mut state = self.shared.state.lock();
        state.request_bot_turn(&self.shared.jobs)
    }

    /// Marks the outstanding bot turn as applied by the caller
    ///
    /// Fails with [`TurnError::ComputationMismatch`] if `turn` is not the
    /// outstanding one. A human move at the next focus acknowledges it
    /// implicitly.
    pub fn acknowledge_bot_turn(&self, turn: &BotTurn<B>) -> Result<()> {
        self.shared.state.lock().acknowledge_bot_turn(turn)
    }

    /// The bot turn played but not yet acknowledged, if any
    pub fn outstanding_bot_turn(&self) -> Option<BotTurn<B>> {
        self.shared.state.lock().delivered.clone()
    }

    /// What is known about the next turn
    pub fn focus(&self) -> FocusView<B> {
        let state = self.shared.state.lock();
        state
            .arena
            .get(state.focus())
            .and_then(Link::view)
            .unwrap_or(FocusView::End)
    }

    /// Outcome of the last turn played, i.e. the current position
    pub fn current(&self) -> Arc<Trans<B>> {
        let state = self.shared.state.lock();
        Arc::clone(&state.start().trans)
    }

    /// Number of terminal leaves reachable from the focus
    pub fn width(&self) -> usize {
        self.shared.state.lock().width()
    }

    /// Turns known ahead on the shortest open branch, see [`compute_depth`]
    pub fn depth(&self) -> Option<usize> {
        let state = self.shared.state.lock();
        compute_depth(&state.arena, state.focus())
    }

    /// Turns played through the scheduler so far
    pub fn traversed_turns(&self) -> usize {
        self.shared.state.lock().stats.traversed_turns
    }

    /// Searches currently running: zero or one
    pub fn active_computations(&self) -> usize {
        usize::from(!self.shared.state.lock().admission.is_idle())
    }

    /// Searches waiting in the backlog
    pub fn queued_computations(&self) -> usize {
        self.shared.state.lock().admission.queued()
    }

    /// Number of links currently held in the tree
    pub fn tree_size(&self) -> usize {
        self.shared.state.lock().arena.len()
    }

    /// A snapshot of the scheduler counters
    pub fn statistics(&self) -> SchedulerStatistics {
        self.shared.state.lock().stats.clone()
    }
}

impl<B: Board> Drop for LinkedTurns<B> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if let Some(slot) = state.admission.active() {
            slot.token.cancel();
        }
        state.waiters.clear();
    }
}

impl<B: Board> fmt::Debug for LinkedTurns<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("LinkedTurns")
            .field("focus", &state.arena.get(state.focus()).map(Link::kind))
            .field("width", &state.width())
            .field("queued", &state.admission.queued())
            .field("traversed_turns", &state.stats.traversed_turns)
            .finish()
    }
}
