//! Workload files.
//!
//! A workload file is TOML with an optional `[scheduler]` table and one
//! `[[process]]` table per process:
//!
//! ```toml
//! [scheduler]
//! quantum = 3
//! preemptive_sjf = false
//!
//! [[process]]
//! id = "P1"
//! arrival = 1
//! burst = 20
//! priority = 3
//! ```

use mlfq_scheduler::SchedulerConfig;
use mlfq_types::{ConfigError, ProcessRegistry, ProcessSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors loading or saving a workload.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workload file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode workload: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Contents of a workload file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadFile {
    /// Scheduler parameters; missing keys take their defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerConfig>,

    /// Processes in registry order.
    #[serde(default, rename = "process")]
    pub processes: Vec<ProcessSpec>,
}

impl WorkloadFile {
    /// Create a workload from process descriptors.
    pub fn new(processes: Vec<ProcessSpec>) -> Self {
        Self {
            scheduler: None,
            processes,
        }
    }

    /// The seven-process workload used when no file is given.
    pub fn reference() -> Self {
        Self::new(vec![
            ProcessSpec::new("P1", 1, 20, 3),
            ProcessSpec::new("P2", 3, 10, 2),
            ProcessSpec::new("P3", 5, 2, 1),
            ProcessSpec::new("P4", 8, 7, 2),
            ProcessSpec::new("P5", 11, 15, 3),
            ProcessSpec::new("P6", 15, 8, 2),
            ProcessSpec::new("P7", 20, 4, 1),
        ])
    }

    /// Set the scheduler parameters.
    pub fn with_scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = Some(config);
        self
    }

    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SimulatorError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a file.
    pub fn load(path: &Path) -> Result<Self, SimulatorError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, SimulatorError> {
        Ok(toml::to_string(self)?)
    }

    /// Scheduler parameters, defaulted when the file has none.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        self.scheduler.unwrap_or_default()
    }

    /// Validate the processes into a shared registry.
    pub fn registry(&self) -> Result<Arc<ProcessRegistry>, SimulatorError> {
        Ok(Arc::new(ProcessRegistry::new(self.processes.iter().cloned())?))
    }
}
