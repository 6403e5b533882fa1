//! Test helpers for the MLFQ scheduler.
//!
//! - [`fixtures`]: reference workloads used across crates
//! - [`properties`]: checks a collected trace against the scheduler's
//!   observable guarantees (single CPU, monotonic bursts, turnaround law, ...)

pub mod fixtures;
pub mod properties;

pub use fixtures::{reference_workload, registry, scenario_workload};
pub use properties::{check_trace, TraceLimits};
