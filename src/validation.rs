//! Input validation for simulation requests.
//!
//! Checks structural integrity of the process set before any simulation
//! runs. Detects:
//! - Empty process sets
//! - Duplicate or reserved pids
//! - Negative arrival times
//! - Non-positive burst times
//! - Non-positive Round Robin quanta
//! - Workloads whose simulated clock would overflow `i64`
//! - Unknown policy names (reported by the policy parser)
//!
//! All violations are collected so the caller can report them together.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Process, IDLE_MARKER};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending process, if the error concerns a single process.
    pub pid: Option<String>,
    /// Offending input field (`"pid"`, `"arrival"`, `"burst"`, `"quantum"`, ...).
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// No processes were supplied.
    EmptyProcessSet,
    /// Two processes share the same pid.
    DuplicateId,
    /// A pid is empty or collides with the idle marker.
    ReservedId,
    /// A process arrives before t=0.
    NegativeArrival,
    /// A process needs zero or negative CPU time.
    NonPositiveBurst,
    /// Round Robin quantum is zero, negative or missing.
    NonPositiveQuantum,
    /// Policy name not recognized.
    UnknownPolicy,
    /// Latest arrival plus total burst exceeds the clock range.
    TimeOverflow,
}

impl ValidationError {
    /// Creates an error not tied to a single process.
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            pid: None,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Attaches the offending pid.
    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }
}

/// Validates a process set.
///
/// Checks:
/// 1. At least one process
/// 2. No empty pid and no pid equal to `"IDLE"`
/// 3. No duplicate pids
/// 4. `arrival >= 0`
/// 5. `burst > 0`
/// 6. `max(arrival) + sum(burst)` fits in `i64`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_processes(processes: &[Process]) -> ValidationResult {
    let mut errors = Vec::new();

    if processes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyProcessSet,
            "processes",
            "At least one process is required",
        ));
    }

    let mut pids = HashSet::new();
    for (i, p) in processes.iter().enumerate() {
        if p.pid.is_empty() || p.pid == IDLE_MARKER {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::ReservedId,
                    "pid",
                    format!("Process #{} has reserved or empty pid '{}'", i + 1, p.pid),
                )
                .with_pid(&p.pid),
            );
        } else if !pids.insert(p.pid.as_str()) {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    "pid",
                    format!("Duplicate process ID: {}", p.pid),
                )
                .with_pid(&p.pid),
            );
        }

        if p.arrival < 0 {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::NegativeArrival,
                    "arrival",
                    format!("Process '{}' has negative arrival time {}", p.pid, p.arrival),
                )
                .with_pid(&p.pid),
            );
        }

        if p.burst <= 0 {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::NonPositiveBurst,
                    "burst",
                    format!("Process '{}' has non-positive burst time {}", p.pid, p.burst),
                )
                .with_pid(&p.pid),
            );
        }
    }

    if horizon(processes).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::TimeOverflow,
            "burst",
            "Latest arrival plus total burst time overflows the simulation clock",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Upper bound on every clock value a run can reach.
///
/// Only well-formed processes count, so a negative arrival or burst never
/// masks an overflow. `None` on overflow.
fn horizon(processes: &[Process]) -> Option<i64> {
    let mut valid = processes.iter().filter(|p| p.arrival >= 0 && p.burst > 0);
    let last_arrival = valid.clone().map(|p| p.arrival).max().unwrap_or(0);
    valid.try_fold(last_arrival, |acc, p| acc.checked_add(p.burst))
}

/// Validates a Round Robin time quantum.
pub fn validate_quantum(quantum: i64) -> ValidationResult {
    if quantum > 0 {
        Ok(())
    } else {
        Err(vec![ValidationError::new(
            ValidationErrorKind::NonPositiveQuantum,
            "quantum",
            format!("Time quantum must be a positive integer, got {quantum}"),
        )])
    }
}
