//! Per-process statistics accumulated during a run.

use mlfq_core::{EngineError, ProcessStats, StatisticsSnapshot};
use mlfq_types::{ProcessId, ProcessRegistry, Tick};

/// Accumulates response, waiting and completion times.
///
/// Fields are append-only: first response and completion are recorded once,
/// waiting time only grows.
#[derive(Debug, Clone)]
pub struct StatisticsCollector {
    entries: Vec<(ProcessId, ProcessStats)>,
}

impl StatisticsCollector {
    /// Create empty stats for every registered process.
    pub fn new(registry: &ProcessRegistry) -> Self {
        Self {
            entries: registry
                .iter()
                .map(|p| (p.id.clone(), ProcessStats::new(p.arrival, p.burst)))
                .collect(),
        }
    }

    fn entry_mut(&mut self, slot: usize) -> Result<&mut (ProcessId, ProcessStats), EngineError> {
        self.entries
            .get_mut(slot)
            .ok_or(EngineError::UnknownSlot { slot })
    }

    /// Record a dispatch at `tick`, closing the waiting interval that began
    /// at `wait_start`.
    pub fn record_dispatch(
        &mut self,
        slot: usize,
        tick: Tick,
        wait_start: Option<Tick>,
    ) -> Result<(), EngineError> {
        let (_, stats) = self.entry_mut(slot)?;
        stats.first_response_time.get_or_insert(tick);
        if let Some(start) = wait_start {
            stats.total_waiting_time += tick.saturating_sub(start);
        }
        Ok(())
    }

    /// Record completion at `tick` and check the turnaround law.
    pub fn record_completion(
        &mut self,
        slot: usize,
        tick: Tick,
    ) -> Result<ProcessStats, EngineError> {
        let (pid, stats) = self.entry_mut(slot)?;

        if let Some(first) = stats.completion_time {
            return Err(EngineError::DoubleCompletion {
                pid: pid.clone(),
                first,
                second: tick,
            });
        }
        stats.completion_time = Some(tick);

        let turnaround = tick.saturating_sub(stats.arrival_time);
        if turnaround != stats.total_waiting_time + stats.burst_time {
            return Err(EngineError::AccountingMismatch {
                pid: pid.clone(),
                turnaround,
                waiting: stats.total_waiting_time,
                burst: stats.burst_time,
            });
        }

        Ok(*stats)
    }

    /// Stats for one slot.
    #[cfg(test)]
    pub fn get(&self, slot: usize) -> Option<&ProcessStats> {
        self.entries.get(slot).map(|(_, stats)| stats)
    }

    /// Snapshot in registry order.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            processes: self.entries.iter().cloned().collect(),
        }
    }
}
