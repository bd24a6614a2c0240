//! Process (job) model.
//!
//! A process is the unit of work handed to the CPU scheduler: it arrives
//! at a point in simulated time and needs a fixed amount of CPU time
//! before it completes.
//!
//! # Reference
//! Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5

use serde::{Deserialize, Serialize};

/// A process to be scheduled.
///
/// Immutable once a simulation starts; runtime state (remaining burst,
/// completion) lives in the engine's registry, never here.
///
/// # Time Representation
/// All times are integer ticks relative to the simulation epoch (t=0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier (e.g. `"P1"`).
    pub pid: String,
    /// Time at which the process enters the ready set.
    pub arrival: i64,
    /// Total CPU time required.
    pub burst: i64,
    /// Scheduling priority (lower value = higher priority).
    #[serde(default)]
    pub priority: i32,
}

impl Process {
    /// Creates a process arriving at `arrival` that needs `burst` ticks of CPU.
    pub fn new(pid: impl Into<String>, arrival: i64, burst: i64) -> Self {
        Self {
            pid: pid.into(),
            arrival,
            burst,
            priority: 0,
        }
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builds `P1..Pn` from `(arrival, burst, priority)` rows, numbering
    /// processes in input order.
    pub fn numbered(rows: &[(i64, i64, i32)]) -> Vec<Self> {
        rows.iter()
            .enumerate()
            .map(|(i, &(arrival, burst, priority))| {
                Self::new(format!("P{}", i + 1), arrival, burst).with_priority(priority)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_builder() {
        let p = Process::new("P1", 3, 7).with_priority(2);
        assert_eq!(p.pid, "P1");
        assert_eq!(p.arrival, 3);
        assert_eq!(p.burst, 7);
        assert_eq!(p.priority, 2);
    }

    #[test]
    fn test_default_priority() {
        assert_eq!(Process::new("P1", 0, 1).priority, 0);
    }

    #[test]
    fn test_numbered() {
        let procs = Process::numbered(&[(0, 5, 1), (1, 3, 0), (2, 8, 2)]);
        let pids: Vec<&str> = procs.iter().map(|p| p.pid.as_str()).collect();
        assert_eq!(pids, vec!["P1", "P2", "P3"]);
        assert_eq!(procs[1].burst, 3);
        assert_eq!(procs[2].priority, 2);
    }

    #[test]
    fn test_priority_defaults_when_missing_from_json() {
        let p: Process = serde_json::from_str(r#"{"pid":"P4","arrival":2,"burst":6}"#).unwrap();
        assert_eq!(p, Process::new("P4", 2, 6));
    }
}
