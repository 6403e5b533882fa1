//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete simulation time.
pub type Tick = u64;

/// Process identifier.
///
/// Displayed verbatim (`P1`, not `Process(P1)`) because trace lines are
/// parsed by front-ends that expect the raw id after `RUN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub String);

impl ProcessId {
    /// Create a new process id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Queue level, 1 (highest priority) through 4 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct QueueLevel(u8);

impl QueueLevel {
    /// Number of queue levels.
    pub const COUNT: usize = 4;

    /// Level 1: first-come-first-served.
    pub const FCFS: Self = QueueLevel(1);

    /// Level 2: shortest remaining burst first.
    pub const SJF: Self = QueueLevel(2);

    /// Level 3: upper round-robin tier.
    pub const RR_HIGH: Self = QueueLevel(3);

    /// Level 4: lower round-robin tier.
    pub const RR_LOW: Self = QueueLevel(4);

    /// All levels, highest priority first.
    pub const ALL: [Self; Self::COUNT] = [Self::FCFS, Self::SJF, Self::RR_HIGH, Self::RR_LOW];

    /// Create a level from its number (returns None outside 1..=4).
    pub fn new(level: u8) -> Option<Self> {
        (1..=Self::COUNT as u8)
            .contains(&level)
            .then_some(QueueLevel(level))
    }

    /// Get the level number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot for array indexing.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The next higher-priority level (returns None at level 1).
    pub fn promoted(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    /// The next lower-priority level (returns None at level 4).
    pub fn demoted(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Whether this level schedules round-robin with a quantum.
    pub fn is_round_robin(self) -> bool {
        self.0 >= 3
    }

    /// Whether waiting processes at this level can be aged upward.
    pub fn is_aging_eligible(self) -> bool {
        self.0 >= 2
    }

    /// The discipline applied at this level.
    pub fn discipline(self, preemptive_sjf: bool) -> Discipline {
        match self.0 {
            1 => Discipline::Fcfs,
            2 => Discipline::Sjf {
                preemptive: preemptive_sjf,
            },
            _ => Discipline::RoundRobin,
        }
    }
}

impl fmt::Display for QueueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

impl From<QueueLevel> for u8 {
    fn from(level: QueueLevel) -> Self {
        level.0
    }
}

impl TryFrom<u8> for QueueLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("queue level must be 1..=4, got {level}"))
    }
}

/// Selection discipline of a queue level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    /// First-come-first-served, runs to completion.
    Fcfs,

    /// Shortest remaining burst first.
    Sjf {
        /// Whether a shorter queued job interrupts the running one.
        preemptive: bool,
    },

    /// Round robin, bounded by the quantum.
    RoundRobin,
}

impl Discipline {
    /// Short label used in trace lines.
    pub fn label(&self) -> &'static str {
        match self {
            Discipline::Fcfs => "FCFS",
            Discipline::Sjf { preemptive: true } => "SJF-P",
            Discipline::Sjf { preemptive: false } => "SJF",
            Discipline::RoundRobin => "RR",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
