//! Random workload generation.
//!
//! Produces reproducible process sets for experiments and property
//! tests. Pids are `P1..Pn` in generation order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::Process;

/// Parameters of a random process set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadGenerator {
    /// Number of processes.
    pub count: usize,
    /// Arrivals are drawn from `0..=max_arrival`.
    pub max_arrival: i64,
    /// Inclusive burst range (clamped to at least 1).
    pub burst_range: (i64, i64),
    /// Inclusive priority range.
    pub priority_range: (i32, i32),
}

impl WorkloadGenerator {
    /// Creates a generator for `count` processes with small default ranges.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            max_arrival: 20,
            burst_range: (1, 10),
            priority_range: (0, 5),
        }
    }

    /// Sets the latest possible arrival.
    pub fn with_max_arrival(mut self, max_arrival: i64) -> Self {
        self.max_arrival = max_arrival;
        self
    }

    /// Sets the inclusive burst range.
    pub fn with_burst_range(mut self, min: i64, max: i64) -> Self {
        self.burst_range = (min, max);
        self
    }

    /// Sets the inclusive priority range.
    pub fn with_priority_range(mut self, min: i32, max: i32) -> Self {
        self.priority_range = (min, max);
        self
    }

    /// Draws a process set from `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Process> {
        let max_arrival = self.max_arrival.max(0);
        let burst_lo = self.burst_range.0.min(self.burst_range.1).max(1);
        let burst_hi = self.burst_range.0.max(self.burst_range.1).max(burst_lo);
        let prio_lo = self.priority_range.0.min(self.priority_range.1);
        let prio_hi = self.priority_range.0.max(self.priority_range.1);

        (1..=self.count)
            .map(|i| {
                Process::new(
                    format!("P{i}"),
                    rng.random_range(0..=max_arrival),
                    rng.random_range(burst_lo..=burst_hi),
                )
                .with_priority(rng.random_range(prio_lo..=prio_hi))
            })
            .collect()
    }

    /// Draws a process set from a seeded generator.
    pub fn generate_seeded(&self, seed: u64) -> Vec<Process> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_processes;

    #[test]
    fn test_seeded_is_reproducible() {
        let g = WorkloadGenerator::new(12);
        assert_eq!(g.generate_seeded(7), g.generate_seeded(7));
    }

    #[test]
    fn test_ranges_respected() {
        let g = WorkloadGenerator::new(50)
            .with_max_arrival(5)
            .with_burst_range(2, 4)
            .with_priority_range(-1, 1);
        let procs = g.generate_seeded(42);
        assert_eq!(procs.len(), 50);
        assert!(procs.iter().all(|p| (0..=5).contains(&p.arrival)));
        assert!(procs.iter().all(|p| (2..=4).contains(&p.burst)));
        assert!(procs.iter().all(|p| (-1..=1).contains(&p.priority)));
        assert_eq!(procs[49].pid, "P50");
    }

    #[test]
    fn test_output_is_valid_input() {
        let g = WorkloadGenerator::new(8).with_burst_range(0, -3);
        let procs = g.generate_seeded(1);
        assert!(validate_processes(&procs).is_ok());
        assert!(procs.iter().all(|p| p.burst == 1));
    }
}
