//! Mutable per-process bookkeeping for one run.

use mlfq_types::{Process, QueueLevel, Tick};

/// Lifecycle of a simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Not yet arrived.
    Pending,
    /// Waiting in exactly one queue.
    Queued,
    /// Holding the CPU.
    Running,
    /// Burst exhausted; only statistics remain.
    Completed,
}

/// Runtime state of one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRuntime {
    pub state: ProcessState,

    /// CPU units still needed. Never increases.
    pub remaining: Tick,

    /// Level the process is queued at (or was dispatched from).
    pub level: QueueLevel,

    /// Run time accumulated since arrival or the last demotion.
    pub proc_time: Tick,

    /// Ticks since `queue_entry_time`, refreshed every tick while queued.
    pub wait_time: Tick,

    /// Tick the process last entered a queue (None when not queued).
    pub queue_entry_time: Option<Tick>,

    /// Start of the current waiting interval (None while running).
    pub last_wait_start: Option<Tick>,
}

impl ProcessRuntime {
    /// Initial runtime state for a registered process.
    pub fn new(process: &Process) -> Self {
        Self {
            state: ProcessState::Pending,
            remaining: process.burst,
            level: process.priority,
            proc_time: 0,
            wait_time: 0,
            queue_entry_time: None,
            last_wait_start: None,
        }
    }

    /// Clear bookkeeping once the burst is exhausted.
    pub(crate) fn finish(&mut self) {
        self.state = ProcessState::Completed;
        self.proc_time = 0;
        self.wait_time = 0;
        self.queue_entry_time = None;
        self.last_wait_start = None;
    }
}
