//! Rule chain for multi-key dispatching.
//!
//! Applies rules lexicographically: the next rule is consulted only when
//! every earlier rule ties. A full tie is broken by input order, so the
//! process listed first (lower pid) wins.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{Candidate, SelectionRule};

/// A composable, lexicographic chain of selection rules.
///
/// # Example
/// ```
/// use u_cpusched::dispatching::RuleChain;
/// use u_cpusched::dispatching::rules;
///
/// let srtf = RuleChain::new()
///     .with_rule(rules::ShortestRemaining)
///     .with_rule(rules::Arrival);
/// assert_eq!(srtf.rule_names(), vec!["SRTF", "FCFS"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn SelectionRule>>,
}

impl RuleChain {
    /// Creates an empty chain (pure input order).
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule.
    pub fn with_rule<R: SelectionRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Compares two candidates. `Less` means `a` runs first.
    pub fn compare(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(a).cmp(&rule.evaluate(b)))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.index.cmp(&b.index))
    }

    /// Returns the input-order index of the highest-priority candidate.
    pub fn select_best(&self, candidates: &[Candidate<'_>]) -> Option<usize> {
        candidates
            .iter()
            .min_by(|a, b| self.compare(a, b))
            .map(|c| c.index)
    }
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChain")
            .field("rules", &self.rule_names())
            .finish()
    }
}
