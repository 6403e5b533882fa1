//! Core types for the MLFQ scheduler.
//!
//! This crate defines the vocabulary shared by the engine and its consumers:
//!
//! - [`TraceEvent`]: the closed set of events a run emits, ending with exactly
//!   one [`TraceEvent::Statistics`] record
//! - [`StatisticsSnapshot`] / [`ProcessStats`]: per-process accounting
//! - [`EngineError`]: runtime invariant violations
//! - [`StateMachine`]: the stepping contract the trace emitter drives

mod error;
mod event;
mod stats;
mod traits;

pub use error::EngineError;
pub use event::TraceEvent;
pub use stats::{Averages, ProcessStats, StatisticsSnapshot};
pub use traits::StateMachine;
