//! Aging, demotion and preemption rules.
//!
//! These are pure decisions over a read-only view of the queues; the state
//! machine applies them.

use crate::{ProcessRuntime, QueueManager};
use mlfq_types::{QueueLevel, Tick};

/// A pending one-level promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    pub slot: usize,
    pub from: QueueLevel,
    pub to: QueueLevel,
}

/// Collect every queued process whose wait reached the aging threshold.
///
/// Candidates are gathered across levels 2, 3, 4 (queue order within each)
/// before anything moves, so a process rises at most one level per pass.
pub fn aging_candidates(
    queues: &QueueManager,
    runtime: &[ProcessRuntime],
    aging_threshold: Tick,
) -> Vec<Promotion> {
    QueueLevel::ALL
        .into_iter()
        .filter(|level| level.is_aging_eligible())
        .flat_map(move |from| {
            queues
                .queued(from)
                .filter(move |&slot| runtime[slot].wait_time >= aging_threshold)
                .filter_map(move |slot| {
                    from.promoted().map(|to| Promotion { slot, from, to })
                })
        })
        .collect()
}

/// What happens to a round-robin process whose time slice ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOutcome {
    /// Drop one level and reset accumulated run time.
    Demote { from: QueueLevel, to: QueueLevel },
    /// Back to the tail of the same level.
    Requeue { level: QueueLevel },
}

/// Decide demotion or requeue at a quantum boundary.
pub fn on_quantum_expiry(
    level: QueueLevel,
    proc_time: Tick,
    demotion_threshold: Tick,
) -> SliceOutcome {
    match level.demoted() {
        Some(to) if proc_time >= demotion_threshold => SliceOutcome::Demote { from: level, to },
        _ => SliceOutcome::Requeue { level },
    }
}

/// Whether the running SJF process must yield to a strictly shorter queued job.
pub fn should_preempt(
    preemptive_sjf: bool,
    level: QueueLevel,
    running_remaining: Tick,
    shortest_queued: Option<Tick>,
) -> bool {
    preemptive_sjf
        && level == QueueLevel::SJF
        && shortest_queued.is_some_and(|shortest| shortest < running_remaining)
}
