//! Admission control for background searches
//!
//! Bot searches are the only heavy work in the crate and at most one runs at
//! a time. [`Admission`] owns the single active slot plus a backlog ordered
//! by depth (shallowest first); the scheduler submits, cancels and completes
//! through it while holding its lock. A single worker thread executes
//! whatever was admitted.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::thread;

use crossbeam_channel::Receiver;
use log::debug;

use crate::{
    board::Board,
    cancel::CancelToken,
    link::{LinkId, Trans},
    scheduler::Computation,
    Result, TurnError,
};

/// Identity of one submitted computation
///
/// Ids increase monotonically, so a result carrying an old id can always be
/// told apart from the one currently occupying the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComputationId(u64);

impl fmt::Display for ComputationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "computation#{}", self.0)
    }
}

struct Queued<T> {
    depth: usize,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Queued<T> {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth && self.seq == other.seq
    }
}

impl<T> Eq for Queued<T> {}

impl<T> PartialOrd for Queued<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Queued<T> {
    // Reversed: the heap pops the shallowest, oldest entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .depth
            .cmp(&self.depth)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue keyed on depth, first-in-first-out within a depth
pub struct DepthQueue<T> {
    heap: BinaryHeap<Queued<T>>,
    seq: u64,
}

impl<T> DepthQueue<T> {
    /// Creates an empty queue
    pub fn new() -> Self {
        DepthQueue {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Adds `item` at `depth`
    pub fn push(&mut self, depth: usize, item: T) {
        self.heap.push(Queued {
            depth,
            seq: self.seq,
            item,
        });
        self.seq += 1;
    }

    /// Removes and returns the shallowest entry
    pub fn pop(&mut self) -> Option<(usize, T)> {
        self.heap.pop().map(|queued| (queued.depth, queued.item))
    }

    /// Keeps only the entries for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.heap.retain(|queued| keep(&queued.item));
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for DepthQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The computation occupying the single active slot
#[derive(Debug, Clone)]
pub struct ActiveSlot {
    /// Identity of the running computation
    pub id: ComputationId,
    /// Branch the computation belongs to
    pub link: LinkId,
    /// Token the running search polls
    pub token: CancelToken,
}

/// Outcome of [`Admission::submit`]
#[derive(Debug)]
pub enum Admit {
    /// The slot was free; run the computation now
    Launch(ComputationId, CancelToken),
    /// The slot is busy; the branch waits in the backlog
    Queued,
}

/// Capacity-one admission control with a depth-ordered backlog
#[derive(Default)]
pub struct Admission {
    active: Option<ActiveSlot>,
    backlog: DepthQueue<LinkId>,
    next_id: u64,
}

impl Admission {
    /// Creates an idle admission controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits the computation for `link` or queues it behind the active one
    pub fn submit(&mut self, link: LinkId, depth: usize) -> Admit {
        if self.active.is_some() {
            self.backlog.push(depth, link);
            return Admit::Queued;
        }
        let (id, token) = self.activate(link);
        Admit::Launch(id, token)
    }

    /// Puts `link` in the free slot with a fresh identity and token
    ///
    /// Callers must check [`is_idle`](Self::is_idle) first.
    pub fn activate(&mut self, link: LinkId) -> (ComputationId, CancelToken) {
        debug_assert!(self.active.is_none(), "slot already occupied");
        let id = ComputationId(self.next_id);
        self.next_id += 1;
        let token = CancelToken::new();
        self.active = Some(ActiveSlot {
            id,
            link,
            token: token.clone(),
        });
        (id, token)
    }

    /// Pops the shallowest queued branch
    pub fn pop_queued(&mut self) -> Option<LinkId> {
        self.backlog.pop().map(|(_, link)| link)
    }

    /// Drops `link` from the backlog
    pub fn dequeue(&mut self, link: LinkId) {
        self.backlog.retain(|queued| *queued != link);
    }

    /// Signals the running computation `id` and frees the slot
    ///
    /// Fails if `id` is not the computation holding the slot.
    pub fn cancel(&mut self, id: ComputationId) -> Result<LinkId> {
        match self.active.take() {
            Some(slot) if slot.id == id => {
                slot.token.cancel();
                debug!("cancelled {} for {}", id, slot.link);
                Ok(slot.link)
            }
            other => {
                let expected = other
                    .as_ref()
                    .map_or_else(|| "an idle slot".to_string(), |slot| slot.id.to_string());
                self.active = other;
                Err(TurnError::ComputationMismatch {
                    expected,
                    found: id.to_string(),
                })
            }
        }
    }

    /// Frees the slot if `id` still holds it, returning its branch
    ///
    /// `None` means the result is stale and must be discarded.
    pub fn complete(&mut self, id: ComputationId) -> Option<LinkId> {
        match &self.active {
            Some(slot) if slot.id == id => self.active.take().map(|slot| slot.link),
            _ => None,
        }
    }

    /// The computation holding the slot, if any
    pub fn active(&self) -> Option<&ActiveSlot> {
        self.active.as_ref()
    }

    /// True if no computation holds the slot
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Number of branches waiting in the backlog
    pub fn queued(&self) -> usize {
        self.backlog.len()
    }
}

/// One admitted computation handed to the worker
pub(crate) struct Job<B: Board> {
    pub id: ComputationId,
    pub link: LinkId,
    pub computation: Computation<B>,
    pub token: CancelToken,
}

/// What the worker reports back for a job
pub(crate) struct JobOutcome<B: Board> {
    pub id: ComputationId,
    pub link: LinkId,
    pub result: Result<(B::Move, Trans<B>)>,
}

/// Starts the background search thread
///
/// The thread runs jobs one at a time and hands each outcome to `on_done`.
/// It exits when the job channel closes or `on_done` returns false.
pub(crate) fn spawn_worker<B, F>(name: &str, jobs: Receiver<Job<B>>, on_done: F) -> Result<()>
where
    B: Board,
    F: Fn(JobOutcome<B>) -> bool + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            for job in jobs.iter() {
                let result = match job.token.check() {
                    Ok(()) => job.computation.run(&job.token),
                    Err(cancelled) => Err(cancelled),
                };
                let outcome = JobOutcome {
                    id: job.id,
                    link: job.link,
                    result,
                };
                if !on_done(outcome) {
                    break;
                }
            }
            debug!("search worker exiting");
        })
        .map(drop)
        .map_err(|err| TurnError::Worker(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{Link, LinkArena};

    #[derive(Clone, Debug)]
    struct Empty;

    impl Board for Empty {
        type Move = usize;
        type Player = usize;
        type Transition = ();

        fn legal_moves(&self, _player: usize) -> Vec<usize> {
            Vec::new()
        }

        fn is_alive(&self, _player: usize) -> bool {
            true
        }

        fn apply_move(&mut self, _player: usize, _mv: &usize) -> impl Iterator<Item = ()> {
            std::iter::empty()
        }

        fn players(&self) -> Vec<usize> {
            vec![0]
        }
    }

    fn ids(count: usize) -> Vec<LinkId> {
        let mut arena: LinkArena<Empty> = LinkArena::new();
        (0..count).map(|_| arena.insert(Link::End)).collect()
    }

    #[test]
    fn test_depth_queue_pops_shallowest_then_oldest() {
        let mut queue = DepthQueue::new();
        queue.push(3, "c");
        queue.push(1, "a");
        queue.push(2, "b1");
        queue.push(2, "b2");

        let order: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(order, vec![(1, "a"), (2, "b1"), (2, "b2"), (3, "c")]);
    }

    #[test]
    fn test_depth_queue_retain() {
        let mut queue = DepthQueue::new();
        for depth in 0..5 {
            queue.push(depth, depth);
        }
        queue.retain(|item| item % 2 == 0);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some((0, 0)));
    }

    #[test]
    fn test_admission_runs_one_and_queues_the_rest() {
        let links = ids(3);
        let mut admission = Admission::new();

        let first = match admission.submit(links[0], 4) {
            Admit::Launch(id, _) => id,
            Admit::Queued => panic!("idle slot should launch"),
        };
        assert!(matches!(admission.submit(links[1], 3), Admit::Queued));
        assert!(matches!(admission.submit(links[2], 2), Admit::Queued));
        assert_eq!(admission.queued(), 2);
        assert_eq!(admission.active().map(|slot| slot.id), Some(first));

        assert_eq!(admission.complete(first), Some(links[0]));
        assert!(admission.is_idle());
        // Shallowest first
        assert_eq!(admission.pop_queued(), Some(links[2]));
    }

    #[test]
    fn test_cancel_signals_token_and_rejects_stale_ids() {
        let links = ids(2);
        let mut admission = Admission::new();
        let (first, token) = admission.activate(links[0]);

        assert_eq!(admission.cancel(first), Ok(links[0]));
        assert!(token.is_cancelled());
        assert!(admission.is_idle());

        // A late result from the cancelled computation is stale
        assert_eq!(admission.complete(first), None);

        let (second, _) = admission.activate(links[1]);
        assert!(matches!(
            admission.cancel(first),
            Err(TurnError::ComputationMismatch { .. })
        ));
        assert_eq!(admission.active().map(|slot| slot.id), Some(second));
    }

    #[test]
    fn test_dequeue_removes_only_that_branch() {
        let links = ids(3);
        let mut admission = Admission::new();
        admission.activate(links[0]);
        admission.submit(links[1], 1);
        admission.submit(links[2], 1);

        admission.dequeue(links[1]);
        assert_eq!(admission.queued(), 1);
        assert_eq!(admission.pop_queued(), Some(links[2]));
    }
}
