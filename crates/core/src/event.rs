//! Trace events emitted by the scheduler.

use crate::StatisticsSnapshot;
use mlfq_types::{Discipline, ProcessId, QueueLevel, Tick};
use serde::Serialize;
use std::fmt;

/// One entry of the scheduling trace.
///
/// The trace is the engine's only observable output. Every run ends with
/// exactly one [`TraceEvent::Statistics`]; consumers discriminate it by
/// variant (or by `"kind": "statistics"` in JSON), never by field shape.
///
/// `Display` renders the stable text form consumed by log viewers: RUN
/// lines start with `TIME <t>: RUN <pid> `, and completion, demotion, aging
/// and idle lines carry `completed`, `DEMOTION`, `AGING` and `IDLE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    // ═══════════════════════════════════════════════════════════════════════
    // Queue transitions
    // ═══════════════════════════════════════════════════════════════════════
    /// Process became queue-eligible at its arrival tick.
    Arrival {
        tick: Tick,
        pid: ProcessId,
        level: QueueLevel,
    },

    /// Process waited long enough to be promoted one level.
    Aging {
        tick: Tick,
        pid: ProcessId,
        from: QueueLevel,
        to: QueueLevel,
    },

    /// Process used up its time slice with enough run time to drop one level.
    Demotion {
        tick: Tick,
        pid: ProcessId,
        from: QueueLevel,
        to: QueueLevel,
        threshold: Tick,
    },

    /// Time slice ended without demotion; back to the tail of the same level.
    #[serde(rename = "quantum_expired_requeue")]
    QuantumExpired {
        tick: Tick,
        pid: ProcessId,
        level: QueueLevel,
    },

    /// Running SJF process displaced by a strictly shorter queued job.
    Preemption {
        tick: Tick,
        pid: ProcessId,
        level: QueueLevel,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // CPU
    // ═══════════════════════════════════════════════════════════════════════
    /// One unit of CPU executed; `tick` is the clock after the unit.
    Run {
        tick: Tick,
        pid: ProcessId,
        remaining: Tick,
        level: QueueLevel,
        discipline: Discipline,
        proc_time: Tick,
    },

    /// Nothing runnable. `next_arrival` is the tick the clock jumps to, or
    /// None when no arrivals remain.
    Idle {
        tick: Tick,
        next_arrival: Option<Tick>,
    },

    /// Process finished its burst.
    Completed { tick: Tick, pid: ProcessId },

    // ═══════════════════════════════════════════════════════════════════════
    // Terminal record
    // ═══════════════════════════════════════════════════════════════════════
    /// Final statistics; always the last event of a run.
    Statistics(StatisticsSnapshot),
}

impl TraceEvent {
    /// Get a machine-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            TraceEvent::Arrival { .. } => "ARRIVAL",
            TraceEvent::Aging { .. } => "AGING",
            TraceEvent::Demotion { .. } => "DEMOTION",
            TraceEvent::QuantumExpired { .. } => "QUANTUM_EXPIRED_REQUEUE",
            TraceEvent::Preemption { .. } => "PREEMPTION",
            TraceEvent::Run { .. } => "RUN",
            TraceEvent::Idle { .. } => "IDLE",
            TraceEvent::Completed { .. } => "COMPLETED",
            TraceEvent::Statistics(_) => "STATISTICS",
        }
    }

    /// The tick the event was decided at (None for the statistics record).
    pub fn tick(&self) -> Option<Tick> {
        match self {
            TraceEvent::Arrival { tick, .. }
            | TraceEvent::Aging { tick, .. }
            | TraceEvent::Demotion { tick, .. }
            | TraceEvent::QuantumExpired { tick, .. }
            | TraceEvent::Preemption { tick, .. }
            | TraceEvent::Run { tick, .. }
            | TraceEvent::Idle { tick, .. }
            | TraceEvent::Completed { tick, .. } => Some(*tick),
            TraceEvent::Statistics(_) => None,
        }
    }

    /// The affected process, if any.
    pub fn pid(&self) -> Option<&ProcessId> {
        match self {
            TraceEvent::Arrival { pid, .. }
            | TraceEvent::Aging { pid, .. }
            | TraceEvent::Demotion { pid, .. }
            | TraceEvent::QuantumExpired { pid, .. }
            | TraceEvent::Preemption { pid, .. }
            | TraceEvent::Run { pid, .. }
            | TraceEvent::Completed { pid, .. } => Some(pid),
            TraceEvent::Idle { .. } | TraceEvent::Statistics(_) => None,
        }
    }

    /// Check if this is the terminal statistics record.
    pub fn is_statistics(&self) -> bool {
        matches!(self, TraceEvent::Statistics(_))
    }

    /// Get the statistics payload, if this is the terminal record.
    pub fn as_statistics(&self) -> Option<&StatisticsSnapshot> {
        match self {
            TraceEvent::Statistics(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Arrival { tick, pid, level } => {
                write!(f, "ARRIVAL: {pid} arrived at TIME {tick} → added to {level}")
            }
            TraceEvent::Aging { pid, from, to, .. } => {
                write!(f, "AGING: {pid} promoted from {from} → {to}")
            }
            TraceEvent::Demotion {
                pid,
                from,
                to,
                threshold,
                ..
            } => write!(
                f,
                "DEMOTION: {pid} demoted from {from} → {to} (PT reached {threshold})"
            ),
            TraceEvent::QuantumExpired { pid, level, .. } => {
                write!(f, "{pid} quantum expired → back to {level}")
            }
            TraceEvent::Preemption { pid, level, .. } => {
                write!(f, "PREEMPTION: {pid} preempted in {level} (shorter job arrived)")
            }
            TraceEvent::Run {
                tick,
                pid,
                remaining,
                level,
                discipline,
                proc_time,
            } => write!(
                f,
                "TIME {tick}: RUN {pid} | Remaining={remaining} | {level} ({discipline}) | PT={proc_time}"
            ),
            TraceEvent::Idle {
                tick,
                next_arrival: Some(next),
            } => write!(f, "TIME {tick}: CPU IDLE → jumping to TIME {next}"),
            TraceEvent::Idle {
                tick,
                next_arrival: None,
            } => write!(f, "TIME {tick}: CPU IDLE (no more processes)"),
            TraceEvent::Completed { tick, pid } => {
                write!(f, "PROCESS {pid} completed at TIME {tick}")
            }
            TraceEvent::Statistics(snapshot) => {
                write!(f, "STATISTICS: {} process(es)", snapshot.len())
            }
        }
    }
}
