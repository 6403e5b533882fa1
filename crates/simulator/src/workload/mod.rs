//! Workload generation for simulations.
//!
//! Provides process-set generators for exercising the scheduler.

mod random;

pub use random::RandomWorkload;

use mlfq_types::ProcessSpec;

/// Trait for generating process workloads.
pub trait WorkloadGenerator {
    /// Generate the next process.
    ///
    /// Arrivals never decrease between calls.
    fn generate_one(&mut self, rng: &mut impl rand::Rng) -> ProcessSpec;

    /// Generate `count` processes.
    fn generate_batch(&mut self, count: usize, rng: &mut impl rand::Rng) -> Vec<ProcessSpec> {
        (0..count).map(|_| self.generate_one(rng)).collect()
    }
}
