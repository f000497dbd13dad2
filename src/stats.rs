//! Statistics collection for the turn scheduler
//!
//! Counters describing how much speculative work was started, finished and
//! thrown away over the life of one scheduler.

/// Counters collected by [`LinkedTurns`](crate::LinkedTurns)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStatistics {
    /// Turns actually played through the scheduler
    pub traversed_turns: usize,

    /// Human branch points materialized by discovery
    pub expansions: usize,

    /// Searches started in the active slot
    pub computations_launched: usize,

    /// Searches that had to wait in the backlog
    pub computations_queued: usize,

    /// Searches whose result was recorded in the tree
    pub computations_completed: usize,

    /// Running searches cancelled because their branch became obsolete
    pub computations_cancelled: usize,

    /// Queued searches dropped from the backlog before they ran
    pub backlog_dropped: usize,

    /// Results that arrived after their computation had been cancelled
    pub stale_results_discarded: usize,

    /// Largest tree width observed during discovery
    pub peak_width: usize,
}

impl SchedulerStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of launched searches whose result was used
    pub fn completion_rate(&self) -> f64 {
        if self.computations_launched == 0 {
            return 0.0;
        }
        self.computations_completed as f64 / self.computations_launched as f64
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        format!(
            "Turn Scheduler Statistics:\n\
             - Traversed turns: {}\n\
             - Human expansions: {}\n\
             - Searches launched: {}\n\
             - Searches queued: {}\n\
             - Searches completed: {} ({:.1}%)\n\
             - Searches cancelled: {}\n\
             - Backlog entries dropped: {}\n\
             - Stale results discarded: {}\n\
             - Peak width: {}",
            self.traversed_turns,
            self.expansions,
            self.computations_launched,
            self.computations_queued,
            self.computations_completed,
            self.completion_rate() * 100.0,
            self.computations_cancelled,
            self.backlog_dropped,
            self.stale_results_discarded,
            self.peak_width
        )
    }
}
