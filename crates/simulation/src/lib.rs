//! Deterministic simulation runner.
//!
//! Wraps a scheduling state machine in a lazy event stream. Given the same
//! registry and configuration, it produces identical traces every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        Trace                            │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Buffer (VecDeque<TraceEvent>)                  │ │
//! │  │     Drained before the machine is stepped again    │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ empty                       │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     SchedulerState::step()                         │ │
//! │  │     One decision or one CPU unit per call          │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Events → buffer, error → yielded once, then end│ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod runner;
mod timeline;
mod trace;

pub use runner::{run_scheduler, run_to_completion, SimulationError, SimulationOutcome};
pub use timeline::{segments, timeline, Segment};
pub use trace::Trace;
