//! Multilevel feedback queue scheduling state machine.
//!
//! This crate implements the scheduling engine as a pure, synchronous
//! state machine over discrete ticks. It handles:
//!
//! - Four queue levels: FCFS, SJF (optionally preemptive), and two
//!   round-robin tiers sharing one quantum
//! - Aging: waiting processes are promoted one level at a time
//! - Demotion: round-robin processes that used enough CPU drop a level
//! - Per-process accounting (response, waiting, completion)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ SchedulerState.step()                                     │
//! │                                                           │
//! │   Schedule phase:                                         │
//! │     arrivals → waiting refresh → aging → select/dispatch  │
//! │     (or IDLE jump to the next arrival)                    │
//! │                                                           │
//! │   Running phase (one CPU unit per step):                  │
//! │     execute → arrivals → waiting refresh → aging → RUN    │
//! │     → complete / preempt / quantum expiry                 │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! All I/O is left to the caller, which consumes the returned events.

mod collector;
mod config;
pub mod policy;
mod queues;
mod runtime;
mod state;

pub use collector::StatisticsCollector;
pub use config::SchedulerConfig;
pub use queues::{EnqueueOutcome, QueueManager};
pub use runtime::{ProcessRuntime, ProcessState};
pub use state::SchedulerState;
