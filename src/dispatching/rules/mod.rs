//! Built-in selection rules.
//!
//! | Rule | Key | Used by |
//! |------|-----|---------|
//! | `Arrival` | arrival time | FCFS, tie-breaking for all others |
//! | `ShortestBurst` | total burst | SJF |
//! | `ShortestRemaining` | remaining burst | SRTF |
//! | `LowestPriority` | priority value | Priority (both variants) |
//!
//! # Score Convention
//! All rules return lower scores for processes that should run first.

use super::{Candidate, RuleScore, SelectionRule};

/// First-Come, First-Served.
///
/// Prioritizes processes that entered the ready set earlier.
#[derive(Debug, Clone, Copy)]
pub struct Arrival;

impl SelectionRule for Arrival {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn evaluate(&self, candidate: &Candidate<'_>) -> RuleScore {
        candidate.process.arrival
    }

    fn description(&self) -> &'static str {
        "First-Come, First-Served"
    }
}

/// Shortest Job First.
///
/// Prioritizes processes with the smallest total burst. Evaluated only at
/// dispatch, when `remaining == burst`.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on a single machine.
#[derive(Debug, Clone, Copy)]
pub struct ShortestBurst;

impl SelectionRule for ShortestBurst {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn evaluate(&self, candidate: &Candidate<'_>) -> RuleScore {
        candidate.process.burst
    }

    fn description(&self) -> &'static str {
        "Shortest Job First"
    }
}

/// Shortest Remaining Time First.
///
/// Prioritizes processes closest to completion.
#[derive(Debug, Clone, Copy)]
pub struct ShortestRemaining;

impl SelectionRule for ShortestRemaining {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn evaluate(&self, candidate: &Candidate<'_>) -> RuleScore {
        candidate.remaining
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Time First"
    }
}

/// Priority scheduling.
///
/// Lower numeric priority = more urgent.
#[derive(Debug, Clone, Copy)]
pub struct LowestPriority;

impl SelectionRule for LowestPriority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, candidate: &Candidate<'_>) -> RuleScore {
        RuleScore::from(candidate.process.priority)
    }

    fn description(&self) -> &'static str {
        "Lowest priority value first"
    }
}
