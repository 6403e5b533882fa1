//! Lazy event stream over a state machine.

use mlfq_core::{EngineError, StateMachine, TraceEvent};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Ordered, finite stream of trace events.
///
/// The machine is stepped only when the buffer runs dry, so pulling one
/// event advances the simulation by at most one step. The stream ends after
/// the STATISTICS record, or after yielding a single engine error. It cannot
/// be restarted; build a new one for another run.
pub struct Trace<M> {
    machine: M,
    buffer: VecDeque<TraceEvent>,
    done: bool,
}

impl<M: StateMachine> Trace<M> {
    /// Wrap a freshly constructed machine.
    pub fn new(machine: M) -> Self {
        Self {
            machine,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// The underlying machine, for inspection between pulls.
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Whether the stream has ended.
    pub fn is_done(&self) -> bool {
        self.done && self.buffer.is_empty()
    }
}

impl<M: StateMachine> Iterator for Trace<M> {
    type Item = Result<TraceEvent, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.buffer.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            if self.machine.is_finished() {
                self.done = true;
                return None;
            }

            match self.machine.step() {
                Ok(events) => self.buffer.extend(events),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<M: StateMachine> FusedIterator for Trace<M> {}
