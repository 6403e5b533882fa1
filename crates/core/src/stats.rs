//! Per-process scheduling statistics.

use indexmap::IndexMap;
use mlfq_types::{ProcessId, Tick};
use serde::{Deserialize, Serialize};

/// Accounting for one process.
///
/// `first_response_time` and `completion_time` are set exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStats {
    pub arrival_time: Tick,
    pub burst_time: Tick,
    pub first_response_time: Option<Tick>,
    pub completion_time: Option<Tick>,
    pub total_waiting_time: Tick,
}

impl ProcessStats {
    /// Fresh stats for a process that has not arrived yet.
    pub fn new(arrival_time: Tick, burst_time: Tick) -> Self {
        Self {
            arrival_time,
            burst_time,
            first_response_time: None,
            completion_time: None,
            total_waiting_time: 0,
        }
    }

    /// Whether the process ran to completion.
    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    /// `completion_time - arrival_time`, if completed.
    pub fn turnaround_time(&self) -> Option<Tick> {
        self.completion_time
            .map(|ct| ct.saturating_sub(self.arrival_time))
    }

    /// Total ready-but-not-running time.
    pub fn waiting_time(&self) -> Tick {
        self.total_waiting_time
    }

    /// `first_response_time - arrival_time`, or 0 if the process never ran.
    pub fn response_time(&self) -> Tick {
        self.first_response_time
            .map_or(0, |rt| rt.saturating_sub(self.arrival_time))
    }
}

/// Average times over completed processes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub turnaround: f64,
    pub waiting: f64,
    pub response: f64,
    pub completed: usize,
}

/// Final statistics of a run, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub processes: IndexMap<ProcessId, ProcessStats>,
}

impl StatisticsSnapshot {
    /// Get stats for a process.
    pub fn get(&self, pid: &ProcessId) -> Option<&ProcessStats> {
        self.processes.get(pid)
    }

    /// Iterate in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProcessId, &ProcessStats)> {
        self.processes.iter()
    }

    /// Iterate over completed processes only.
    pub fn completed(&self) -> impl Iterator<Item = (&ProcessId, &ProcessStats)> {
        self.processes.iter().filter(|(_, s)| s.is_completed())
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Latest completion time across all processes.
    pub fn makespan(&self) -> Option<Tick> {
        self.processes.values().filter_map(|s| s.completion_time).max()
    }

    /// Averages over completed processes (returns None if none completed).
    pub fn averages(&self) -> Option<Averages> {
        let mut completed = 0usize;
        let (mut tat, mut wt, mut rt) = (0u64, 0u64, 0u64);

        for (_, stats) in self.completed() {
            completed += 1;
            tat += stats.turnaround_time().unwrap_or(0);
            wt += stats.waiting_time();
            rt += stats.response_time();
        }

        if completed == 0 {
            return None;
        }

        let n = completed as f64;
        Some(Averages {
            turnaround: tat as f64 / n,
            waiting: wt as f64 / n,
            response: rt as f64 / n,
            completed,
        })
    }
}
