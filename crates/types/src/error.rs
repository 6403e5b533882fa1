//! Configuration errors.

use crate::ProcessId;
use thiserror::Error;

/// Errors detected while validating a workload or scheduler configuration.
///
/// These are raised before any simulation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two processes share an id.
    #[error("Duplicate process id: {0}")]
    DuplicateProcessId(ProcessId),

    /// A process has an empty id.
    #[error("Process #{index} has an empty id")]
    EmptyProcessId { index: usize },

    /// Arrival time is negative.
    #[error("Process {id}: arrival time must be >= 0, got {arrival}")]
    InvalidArrival { id: ProcessId, arrival: i64 },

    /// Burst time is zero or negative.
    #[error("Process {id}: burst time must be > 0, got {burst}")]
    InvalidBurst { id: ProcessId, burst: i64 },

    /// Priority is outside 1..=4.
    #[error("Process {id}: priority must be in 1..=4, got {priority}")]
    InvalidPriority { id: ProcessId, priority: i64 },

    /// A scheduler parameter is below its minimum of 1.
    #[error("Scheduler parameter `{name}` must be >= 1, got {value}")]
    InvalidParameter { name: &'static str, value: u64 },
}
