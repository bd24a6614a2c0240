//! Candidate view passed to selection rules.

use crate::models::Process;

/// A ready (or running) process as seen by the selection rules.
///
/// `index` is the process's position in the input order and doubles as
/// the final tie-breaker.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Input-order index.
    pub index: usize,
    /// Immutable process data.
    pub process: &'a Process,
    /// CPU time still owed to the process.
    pub remaining: i64,
}

impl<'a> Candidate<'a> {
    /// Creates a candidate that has not run yet (`remaining == burst`).
    pub fn new(index: usize, process: &'a Process) -> Self {
        Self {
            index,
            process,
            remaining: process.burst,
        }
    }

    /// Sets the remaining CPU time.
    pub fn with_remaining(mut self, remaining: i64) -> Self {
        self.remaining = remaining;
        self
    }
}
