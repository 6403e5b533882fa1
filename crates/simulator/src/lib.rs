//! MLFQ Simulator
//!
//! Batch front end for the scheduling engine.
//!
//! # Architecture
//!
//! The simulator builds on `mlfq-simulation` to provide:
//!
//! - **Workload files**: TOML descriptions of processes and scheduler parameters
//! - **Workload generation**: Seeded random process sets
//! - **Reporting**: Per-process table, averages, CPU utilisation and timeline
//!
//! # Example
//!
//! ```ignore
//! use mlfq_simulator::{SimulationReport, WorkloadFile};
//! use mlfq_simulation::run_to_completion;
//!
//! let workload = WorkloadFile::reference();
//! let outcome = run_to_completion(workload.registry()?, workload.scheduler_config())?;
//!
//! SimulationReport::new(&outcome).print();
//! ```

pub mod config;
pub mod report;
pub mod workload;

pub use config::{SimulatorError, WorkloadFile};
pub use report::{ReportRow, SimulationReport};
pub use workload::{RandomWorkload, WorkloadGenerator};
