//! The four ready queues.
//!
//! Queues hold process slots (registry indices). A membership index makes
//! "is this slot queued, and where" an O(1) lookup, which is what keeps the
//! one-queue-per-process invariant cheap to enforce.

use mlfq_types::{QueueLevel, Tick};
use std::collections::VecDeque;

/// Result of an enqueue request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Appended at the tail.
    Inserted,
    /// Already queued at the requested level; left in place.
    AlreadyPresent,
    /// Queued at a different level; nothing changed.
    Conflict(QueueLevel),
}

/// Four FIFO containers indexed by [`QueueLevel`].
#[derive(Debug, Clone)]
pub struct QueueManager {
    queues: [VecDeque<usize>; QueueLevel::COUNT],
    /// slot -> level currently holding it
    membership: Vec<Option<QueueLevel>>,
}

impl QueueManager {
    /// Create empty queues for `slots` processes.
    pub fn new(slots: usize) -> Self {
        Self {
            queues: Default::default(),
            membership: vec![None; slots],
        }
    }

    /// Append a slot to the tail of `level` unless already present.
    pub fn enqueue(&mut self, slot: usize, level: QueueLevel) -> EnqueueOutcome {
        match self.membership[slot] {
            Some(current) if current == level => EnqueueOutcome::AlreadyPresent,
            Some(current) => EnqueueOutcome::Conflict(current),
            None => {
                self.queues[level.index()].push_back(slot);
                self.membership[slot] = Some(level);
                EnqueueOutcome::Inserted
            }
        }
    }

    /// Remove a slot from whichever queue holds it.
    ///
    /// Returns the level it was removed from.
    pub fn remove_if_present(&mut self, slot: usize) -> Option<QueueLevel> {
        let level = self.membership[slot].take()?;
        let queue = &mut self.queues[level.index()];
        if let Some(pos) = queue.iter().position(|&s| s == slot) {
            queue.remove(pos);
        }
        Some(level)
    }

    /// Lowest-numbered non-empty level.
    pub fn highest_non_empty(&self) -> Option<QueueLevel> {
        QueueLevel::ALL
            .into_iter()
            .find(|level| !self.queues[level.index()].is_empty())
    }

    /// Pop the next slot from `level` according to its discipline.
    ///
    /// FCFS and round-robin take the front. SJF takes the smallest
    /// remaining burst; equal bursts go to whichever was enqueued first.
    pub fn select_next(
        &mut self,
        level: QueueLevel,
        remaining: impl Fn(usize) -> Tick,
    ) -> Option<usize> {
        let queue = &mut self.queues[level.index()];
        let slot = if level == QueueLevel::SJF {
            let (pos, _) = queue
                .iter()
                .enumerate()
                .min_by_key(|&(pos, &slot)| (remaining(slot), pos))?;
            queue.remove(pos)?
        } else {
            queue.pop_front()?
        };
        self.membership[slot] = None;
        Some(slot)
    }

    /// Smallest remaining burst among slots queued at `level`.
    pub fn shortest_remaining(
        &self,
        level: QueueLevel,
        remaining: impl Fn(usize) -> Tick,
    ) -> Option<Tick> {
        self.queues[level.index()]
            .iter()
            .map(|&slot| remaining(slot))
            .min()
    }

    /// Slots queued at `level`, front to back.
    pub fn queued(&self, level: QueueLevel) -> impl Iterator<Item = usize> + '_ {
        self.queues[level.index()].iter().copied()
    }

    /// Level currently holding `slot`.
    #[cfg(test)]
    pub fn level_of(&self, slot: usize) -> Option<QueueLevel> {
        self.membership.get(slot).copied().flatten()
    }

    /// Number of slots queued at `level`.
    #[cfg(test)]
    pub fn len(&self, level: QueueLevel) -> usize {
        self.queues[level.index()].len()
    }

    /// Whether every queue is empty.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }
}
