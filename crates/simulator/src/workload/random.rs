//! Uniform random process generator.

use crate::workload::WorkloadGenerator;
use mlfq_types::{ProcessSpec, QueueLevel, Tick};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Generates processes `P1, P2, ...` with random gaps, bursts and levels.
pub struct RandomWorkload {
    /// Largest gap between consecutive arrivals.
    max_arrival_gap: Tick,

    /// Inclusive burst range.
    min_burst: Tick,
    max_burst: Tick,

    /// Arrival of the previous process.
    clock: Tick,

    /// Number of processes generated so far.
    generated: usize,
}

impl RandomWorkload {
    /// Create a generator with gaps up to 5 and bursts 1..=20.
    pub fn new() -> Self {
        Self {
            max_arrival_gap: 5,
            min_burst: 1,
            max_burst: 20,
            clock: 0,
            generated: 0,
        }
    }

    /// Set the largest arrival gap.
    pub fn with_max_arrival_gap(mut self, gap: Tick) -> Self {
        self.max_arrival_gap = gap;
        self
    }

    /// Set the burst range. Bounds are clamped to at least 1 and ordered.
    pub fn with_burst_range(mut self, min: Tick, max: Tick) -> Self {
        let min = min.max(1);
        self.min_burst = min;
        self.max_burst = max.max(min);
        self
    }

    /// Generate `count` processes from a seed. Same seed, same workload.
    pub fn generate_seeded(mut self, count: usize, seed: u64) -> Vec<ProcessSpec> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let batch = self.generate_batch(count, &mut rng);
        debug!(count, seed, "Generated workload");
        batch
    }
}

impl Default for RandomWorkload {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadGenerator for RandomWorkload {
    fn generate_one(&mut self, rng: &mut impl rand::Rng) -> ProcessSpec {
        if self.generated > 0 {
            self.clock += rng.gen_range(0..=self.max_arrival_gap);
        }
        self.generated += 1;

        let burst = rng.gen_range(self.min_burst..=self.max_burst);
        let priority = rng.gen_range(1..=QueueLevel::COUNT);

        ProcessSpec::new(
            format!("P{}", self.generated),
            self.clock as i64,
            burst as i64,
            priority as i64,
        )
    }
}
