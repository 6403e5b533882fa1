//! CPU timeline extraction from a trace.

use mlfq_core::TraceEvent;
use mlfq_types::{ProcessId, Tick};

/// A contiguous stretch of CPU time held by one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub pid: ProcessId,
    /// Tick the first unit started.
    pub start: Tick,
    /// Tick the last unit ended.
    pub end: Tick,
}

impl Segment {
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// `(tick, pid)` for every RUN event, in trace order.
///
/// The tick is the clock after the unit ran, as printed on the RUN line.
pub fn timeline<'a>(events: impl IntoIterator<Item = &'a TraceEvent>) -> Vec<(Tick, ProcessId)> {
    events
        .into_iter()
        .filter_map(|event| match event {
            TraceEvent::Run { tick, pid, .. } => Some((*tick, pid.clone())),
            _ => None,
        })
        .collect()
}

/// Merge consecutive units of the same process into segments.
///
/// A gap in ticks (idle CPU) or a change of process starts a new segment.
pub fn segments(timeline: &[(Tick, ProcessId)]) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for (tick, pid) in timeline {
        let start = tick.saturating_sub(1);
        match out.last_mut() {
            Some(last) if last.pid == *pid && last.end == start => last.end = *tick,
            _ => out.push(Segment {
                pid: pid.clone(),
                start,
                end: *tick,
            }),
        }
    }
    out
}
