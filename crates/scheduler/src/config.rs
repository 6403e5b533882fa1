//! Scheduler configuration.

use mlfq_types::{ConfigError, Tick};
use serde::{Deserialize, Serialize};

/// Configuration for the scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum contiguous units per dispatch at the round-robin levels.
    pub quantum: Tick,

    /// Ticks a process may wait in a queue before being promoted one level.
    pub aging_threshold: Tick,

    /// Accumulated run time at which a round-robin process is demoted when
    /// its slice ends.
    pub demotion_threshold: Tick,

    /// Whether a shorter job queued at level 2 interrupts the running one.
    pub preemptive_sjf: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quantum: 3,
            aging_threshold: 5,
            demotion_threshold: 6,
            preemptive_sjf: true,
        }
    }
}

impl SchedulerConfig {
    /// Create a config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the round-robin quantum.
    pub fn with_quantum(mut self, quantum: Tick) -> Self {
        self.quantum = quantum;
        self
    }

    /// Set the aging threshold.
    pub fn with_aging_threshold(mut self, threshold: Tick) -> Self {
        self.aging_threshold = threshold;
        self
    }

    /// Set the demotion threshold.
    pub fn with_demotion_threshold(mut self, threshold: Tick) -> Self {
        self.demotion_threshold = threshold;
        self
    }

    /// Enable or disable SJF preemption.
    pub fn with_preemptive_sjf(mut self, preemptive: bool) -> Self {
        self.preemptive_sjf = preemptive;
        self
    }

    /// Check that every parameter is at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("quantum", self.quantum),
            ("aging_threshold", self.aging_threshold),
            ("demotion_threshold", self.demotion_threshold),
        ] {
            if value < 1 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
