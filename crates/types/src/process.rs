//! Process descriptors and the validated registry.

use crate::{ConfigError, ProcessId, QueueLevel, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unvalidated process descriptor, as read from a workload file or built by hand.
///
/// Fields are signed so that out-of-range input survives parsing and is
/// rejected by [`ProcessRegistry::new`] with a descriptive error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: String,
    pub arrival: i64,
    pub burst: i64,
    pub priority: i64,
}

impl ProcessSpec {
    /// Create a new process descriptor.
    pub fn new(id: impl Into<String>, arrival: i64, burst: i64, priority: i64) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            priority,
        }
    }
}

/// A validated, immutable process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    /// Unique id.
    pub id: ProcessId,

    /// Tick at which the process becomes queue-eligible.
    pub arrival: Tick,

    /// Total CPU units required (always > 0).
    pub burst: Tick,

    /// Starting queue level.
    pub priority: QueueLevel,
}

impl TryFrom<(usize, ProcessSpec)> for Process {
    type Error = ConfigError;

    fn try_from((index, spec): (usize, ProcessSpec)) -> Result<Self, Self::Error> {
        if spec.id.trim().is_empty() {
            return Err(ConfigError::EmptyProcessId { index });
        }
        let id = ProcessId(spec.id);

        let arrival = Tick::try_from(spec.arrival).map_err(|_| ConfigError::InvalidArrival {
            id: id.clone(),
            arrival: spec.arrival,
        })?;

        let burst = Tick::try_from(spec.burst)
            .ok()
            .filter(|&burst| burst > 0)
            .ok_or_else(|| ConfigError::InvalidBurst {
                id: id.clone(),
                burst: spec.burst,
            })?;

        let priority = u8::try_from(spec.priority)
            .ok()
            .and_then(QueueLevel::new)
            .ok_or_else(|| ConfigError::InvalidPriority {
                id: id.clone(),
                priority: spec.priority,
            })?;

        Ok(Process {
            id,
            arrival,
            burst,
            priority,
        })
    }
}

/// Ordered, validated set of processes for a simulation.
///
/// Registry order is significant: arrivals at the same tick are admitted in
/// registry order, and the final statistics are reported in registry order.
/// A registry is never mutated by a run and can be shared across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
}

impl ProcessRegistry {
    /// Validate descriptors and build a registry.
    ///
    /// Fails on the first invalid descriptor or duplicate id.
    pub fn new(specs: impl IntoIterator<Item = ProcessSpec>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut processes = Vec::new();

        for (index, spec) in specs.into_iter().enumerate() {
            let process = Process::try_from((index, spec))?;
            if !seen.insert(process.id.clone()) {
                return Err(ConfigError::DuplicateProcessId(process.id));
            }
            processes.push(process);
        }

        Ok(Self { processes })
    }

    /// Get a process by registry index.
    pub fn get(&self, index: usize) -> Option<&Process> {
        self.processes.get(index)
    }

    /// Find the registry index of a process id.
    pub fn index_of(&self, id: &ProcessId) -> Option<usize> {
        self.processes.iter().position(|p| &p.id == id)
    }

    /// Iterate over processes in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.processes.iter()
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Sum of all burst times.
    pub fn total_burst(&self) -> Tick {
        self.processes.iter().map(|p| p.burst).sum()
    }
}

impl<'a> IntoIterator for &'a ProcessRegistry {
    type Item = &'a Process;
    type IntoIter = std::slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
