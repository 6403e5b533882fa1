//! Error types for the scheduling engine.

use mlfq_types::{ProcessId, QueueLevel, Tick};
use thiserror::Error;

/// Runtime invariant violations.
///
/// Any of these means the engine itself is defective; the run is aborted
/// rather than continuing with an inconsistent trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Tried to execute a unit for a process with nothing left to run.
    #[error("TIME {tick}: {pid} has no remaining burst but was scheduled to run")]
    BurstUnderflow { pid: ProcessId, tick: Tick },

    /// A process was about to be placed in a second queue.
    #[error("{pid} is already queued in {current}, cannot also enqueue in {requested}")]
    DuplicateMembership {
        pid: ProcessId,
        current: QueueLevel,
        requested: QueueLevel,
    },

    /// A queue selection found nothing or found a process in the wrong state.
    #[error("TIME {tick}: no runnable process in {level}")]
    EmptySelection { level: QueueLevel, tick: Tick },

    /// A process slot did not match any registered process.
    #[error("Unknown process slot {slot}")]
    UnknownSlot { slot: usize },

    /// A process was completed twice.
    #[error("{pid} completed twice (first at TIME {first}, again at TIME {second})")]
    DoubleCompletion {
        pid: ProcessId,
        first: Tick,
        second: Tick,
    },

    /// Turnaround did not equal waiting plus service time at completion.
    #[error("{pid}: turnaround {turnaround} != waiting {waiting} + burst {burst}")]
    AccountingMismatch {
        pid: ProcessId,
        turnaround: Tick,
        waiting: Tick,
        burst: Tick,
    },

    /// All queues empty, no pending arrivals, yet processes remain incomplete.
    #[error("TIME {tick}: scheduler stalled with {incomplete} incomplete process(es)")]
    Stalled { tick: Tick, incomplete: usize },
}
