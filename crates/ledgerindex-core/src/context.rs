//! Execution context handed to every emission call.
//!
//! The host's block-execution pipeline owns the context; the indexer only reads
//! the block height, block time, and whether the current execution commits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the indexer needs to know about the execution it is observing.
pub trait ExecutionContext {
    /// Height of the block being executed.
    fn block_height(&self) -> i64;

    /// Header time of the block being executed.
    fn block_time(&self) -> DateTime<Utc>;

    /// `true` when the execution will not be committed (mempool checks, simulations).
    fn is_simulated(&self) -> bool;

    fn block_time_unix_micro(&self) -> i64 {
        self.block_time().timestamp_micros()
    }
}

/// How a state transition is being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecMode {
    /// Block finalization; results are committed.
    Finalize,
    /// Mempool admission check.
    Check,
    /// Mempool re-check after a commit.
    ReCheck,
    /// Gas estimation / dry run.
    Simulate,
}

impl ExecMode {
    pub fn commits(&self) -> bool {
        matches!(self, Self::Finalize)
    }
}

impl std::fmt::Display for ExecMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finalize => write!(f, "finalize"),
            Self::Check => write!(f, "check"),
            Self::ReCheck => write!(f, "recheck"),
            Self::Simulate => write!(f, "simulate"),
        }
    }
}

/// Plain-data execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    pub height: i64,
    pub time: DateTime<Utc>,
    pub mode: ExecMode,
}

impl BlockContext {
    /// A committing context at `height`.
    pub fn new(height: i64, time: DateTime<Utc>) -> Self {
        Self {
            height,
            time,
            mode: ExecMode::Finalize,
        }
    }

    /// The committing context genesis runs in (height 0).
    pub fn genesis(time: DateTime<Utc>) -> Self {
        Self::new(0, time)
    }

    pub fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    /// Same block, executed as a simulation.
    pub fn simulated(&self) -> Self {
        self.clone().with_mode(ExecMode::Simulate)
    }
}

impl ExecutionContext for BlockContext {
    fn block_height(&self) -> i64 {
        self.height
    }

    fn block_time(&self) -> DateTime<Utc> {
        self.time
    }

    fn is_simulated(&self) -> bool {
        !self.mode.commits()
    }
}

impl<C: ExecutionContext + ?Sized> ExecutionContext for &C {
    fn block_height(&self) -> i64 {
        (**self).block_height()
    }

    fn block_time(&self) -> DateTime<Utc> {
        (**self).block_time()
    }

    fn is_simulated(&self) -> bool {
        (**self).is_simulated()
    }
}
