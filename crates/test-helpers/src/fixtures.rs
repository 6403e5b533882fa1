//! Reference workloads.

use mlfq_types::{ProcessRegistry, ProcessSpec};
use std::sync::Arc;

/// The seven-process workload loaded by default.
pub fn reference_workload() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new("P1", 1, 20, 3),
        ProcessSpec::new("P2", 3, 10, 2),
        ProcessSpec::new("P3", 5, 2, 1),
        ProcessSpec::new("P4", 8, 7, 2),
        ProcessSpec::new("P5", 11, 15, 3),
        ProcessSpec::new("P6", 15, 8, 2),
        ProcessSpec::new("P7", 20, 4, 1),
    ]
}

/// The first three processes of the reference workload.
pub fn scenario_workload() -> Vec<ProcessSpec> {
    reference_workload().into_iter().take(3).collect()
}

/// Build a shared registry, panicking on invalid input.
pub fn registry(specs: Vec<ProcessSpec>) -> Arc<ProcessRegistry> {
    Arc::new(ProcessRegistry::new(specs).expect("fixture workload must be valid"))
}
