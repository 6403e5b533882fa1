//! Core types for the MLFQ scheduler.
//!
//! Everything in this crate is immutable configuration: who the simulated
//! processes are, which queue level they start in, and the scheduling
//! discipline each level applies. Runtime state lives in `mlfq-scheduler`.

mod error;
mod identifiers;
mod process;

pub use error::ConfigError;
pub use identifiers::{Discipline, ProcessId, QueueLevel, Tick};
pub use process::{Process, ProcessRegistry, ProcessSpec};
