//! Configuration options for the turn scheduler
//!
//! This module defines the parameters that bound how much speculative work
//! the scheduler keeps outstanding.

use crate::{Result, TurnError};

/// Default soft bound on the number of open leaves reachable from the next turn
pub const DEFAULT_MAX_WIDTH: usize = 20;

/// Configuration for [`LinkedTurns`](crate::LinkedTurns)
///
/// # Example
///
/// ```
/// use cascade_turns::SchedulerConfig;
///
/// let config = SchedulerConfig::default()
///     .with_max_width(32)
///     .with_worker_name("speculative-bots");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Soft maximum for the tree width
    ///
    /// Discovery stops expanding once the number of terminal leaves reachable
    /// from the next turn reaches this value. A single human branch point may
    /// push the width past it by its own branching factor.
    pub max_width: usize,

    /// Name given to the background search thread
    pub worker_name: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            max_width: DEFAULT_MAX_WIDTH,
            worker_name: "bot-search".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Sets the soft maximum width
    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Sets the name of the background search thread
    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    /// Checks that the configuration can drive a scheduler
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(TurnError::InvalidConfiguration(
                "max_width must be at least 1".to_string(),
            ));
        }
        if self.worker_name.is_empty() {
            return Err(TurnError::InvalidConfiguration(
                "worker_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
