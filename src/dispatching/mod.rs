//! Selection rules and rule chains for CPU dispatching.
//!
//! Each scheduling policy picks the next process from the ready set by
//! comparing a small number of integer keys (arrival, burst, remaining
//! time, priority). Rules compute one key each; a [`RuleChain`] applies
//! them in order and falls back to input order on a full tie.
//!
//! # Usage
//!
//! ```
//! use u_cpusched::dispatching::{Candidate, RuleChain};
//! use u_cpusched::dispatching::rules;
//! use u_cpusched::models::Process;
//!
//! let procs = Process::numbered(&[(0, 8, 0), (0, 3, 0)]);
//! let ready: Vec<Candidate> = procs
//!     .iter()
//!     .enumerate()
//!     .map(|(i, p)| Candidate::new(i, p))
//!     .collect();
//!
//! let chain = RuleChain::new()
//!     .with_rule(rules::ShortestBurst)
//!     .with_rule(rules::Arrival);
//! assert_eq!(chain.select_best(&ready), Some(1));
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod chain;
mod context;
pub mod rules;

pub use chain::RuleChain;
pub use context::Candidate;

use std::fmt::Debug;

/// Score returned by a selection rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = i64;

/// A rule that scores a ready process.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for processes that should run first.
pub trait SelectionRule: Send + Sync + Debug {
    /// Rule name (e.g., "FCFS", "SRTF").
    fn name(&self) -> &'static str;

    /// Scores a candidate. Lower = dispatched first.
    fn evaluate(&self, candidate: &Candidate<'_>) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
