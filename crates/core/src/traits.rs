//! Core traits for state machines.

use crate::{EngineError, TraceEvent};
use mlfq_types::Tick;

/// A scheduler that advances in discrete steps.
///
/// This is the core abstraction between the engine and the trace emitter.
/// Implementations are:
///
/// - **Synchronous**: No async, no `.await`
/// - **Deterministic**: Same state = same events
/// - **Self-contained**: All mutable state is owned by the implementor
///
/// # Example
///
/// ```ignore
/// let mut state = SchedulerState::new(registry, config)?;
/// while !state.is_finished() {
///     for event in state.step()? {
///         println!("{event}");
///     }
/// }
/// ```
pub trait StateMachine {
    /// Advance by the smallest unit of work that can produce events.
    ///
    /// # Guarantees
    ///
    /// - **Bounded**: A single call executes at most one CPU unit
    /// - **Ordered**: Events are returned in the order they were decided
    /// - **Terminal**: The final successful call returns exactly one
    ///   [`TraceEvent::Statistics`], after which [`is_finished`] is true
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when a runtime invariant is violated. The
    /// machine is unusable afterwards and further calls return the same error.
    ///
    /// [`is_finished`]: StateMachine::is_finished
    fn step(&mut self) -> Result<Vec<TraceEvent>, EngineError>;

    /// Get the current simulation clock.
    fn now(&self) -> Tick;

    /// Whether the statistics record has been emitted.
    fn is_finished(&self) -> bool;
}
