//! Process registry: immutable input plus per-run mutable state.
//!
//! Each process moves through an explicit state machine:
//!
//! ```text
//! Unarrived → Ready → Running → Completed
//!               ↑________|  (preempted)
//! ```
//!
//! Every transition is checked; an illegal one is reported as
//! `Unschedulable` instead of silently corrupting the run.

use serde::{Deserialize, Serialize};

use crate::dispatching::Candidate;
use crate::error::SimulationError;
use crate::models::Process;
use crate::validation::validate_processes;

/// Lifecycle state of a process within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Arrival time not reached yet.
    Unarrived,
    /// In the ready set, waiting for the CPU.
    Ready,
    /// Holding the CPU.
    Running,
    /// All CPU time delivered.
    Completed,
}

/// Mutable per-run state of one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeState {
    /// CPU time still owed. Never increases.
    pub remaining: i64,
    /// Time `remaining` reached zero. Set exactly once.
    pub completion: Option<i64>,
    /// Time of the first dispatch.
    pub first_start: Option<i64>,
    /// Lifecycle state.
    pub state: ProcessState,
}

/// Owns the process set and its runtime state for a single simulation run.
///
/// Created fresh per run and dropped with it; no state crosses runs.
#[derive(Debug, Clone)]
pub struct ProcessRegistry<'a> {
    processes: &'a [Process],
    runtime: Vec<RuntimeState>,
    /// Indices sorted by (arrival, input order).
    arrival_order: Vec<usize>,
    /// Position in `arrival_order` of the next process to admit.
    next_arrival: usize,
}

impl<'a> ProcessRegistry<'a> {
    /// Builds a registry over a validated process set.
    ///
    /// # Errors
    /// `InvalidInput` when the set is empty, has duplicate or reserved pids,
    /// negative arrivals, non-positive bursts or a clock horizon past `i64::MAX`.
    pub fn new(processes: &'a [Process]) -> Result<Self, SimulationError> {
        validate_processes(processes)?;

        let runtime = processes
            .iter()
            .map(|p| RuntimeState {
                remaining: p.burst,
                completion: None,
                first_start: None,
                state: ProcessState::Unarrived,
            })
            .collect();

        let mut arrival_order: Vec<usize> = (0..processes.len()).collect();
        arrival_order.sort_by_key(|&i| (processes[i].arrival, i));

        Ok(Self {
            processes,
            runtime,
            arrival_order,
            next_arrival: 0,
        })
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether the registry is empty (never true after `new` succeeds).
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// The input processes, in input order.
    pub fn processes(&self) -> &'a [Process] {
        self.processes
    }

    /// Immutable data of one process.
    pub fn process(&self, index: usize) -> &'a Process {
        &self.processes[index]
    }

    /// Runtime state of one process.
    pub fn runtime(&self, index: usize) -> &RuntimeState {
        &self.runtime[index]
    }

    /// Earliest arrival time across all processes.
    pub fn earliest_arrival(&self) -> Option<i64> {
        self.arrival_order
            .first()
            .map(|&i| self.processes[i].arrival)
    }

    /// Arrival time of the next process not admitted yet.
    pub fn next_arrival_time(&self) -> Option<i64> {
        self.arrival_order
            .get(self.next_arrival)
            .map(|&i| self.processes[i].arrival)
    }

    /// Moves every process with `arrival <= now` into the ready set.
    ///
    /// Returns the admitted indices in (arrival, input order) order.
    pub fn admit_until(&mut self, now: i64) -> Vec<usize> {
        let mut admitted = Vec::new();
        while let Some(&i) = self.arrival_order.get(self.next_arrival) {
            if self.processes[i].arrival > now {
                break;
            }
            self.runtime[i].state = ProcessState::Ready;
            admitted.push(i);
            self.next_arrival += 1;
        }
        admitted
    }

    /// Ready and running processes as selection candidates, in input order.
    pub fn candidates(&self) -> Vec<Candidate<'a>> {
        let processes = self.processes;
        self.runtime
            .iter()
            .enumerate()
            .filter(|(_, rt)| matches!(rt.state, ProcessState::Ready | ProcessState::Running))
            .map(|(i, rt)| Candidate::new(i, &processes[i]).with_remaining(rt.remaining))
            .collect()
    }

    /// Ready → Running. Records the first dispatch time.
    pub fn dispatch(&mut self, index: usize, now: i64) -> Result<(), SimulationError> {
        self.transition(index, ProcessState::Ready, ProcessState::Running)?;
        let rt = &mut self.runtime[index];
        rt.first_start.get_or_insert(now);
        Ok(())
    }

    /// Running → Ready.
    pub fn preempt(&mut self, index: usize) -> Result<(), SimulationError> {
        self.transition(index, ProcessState::Running, ProcessState::Ready)
    }

    /// Charges `ticks` of CPU to a running process that ran until `end`.
    ///
    /// Moves the process to `Completed` when its remaining time reaches zero.
    pub fn execute(&mut self, index: usize, ticks: i64, end: i64) -> Result<(), SimulationError> {
        let processes = self.processes;
        let pid = &processes[index].pid;
        let rt = &mut self.runtime[index];
        if rt.state != ProcessState::Running {
            return Err(SimulationError::Unschedulable(format!(
                "process {pid} executed while {:?}",
                rt.state
            )));
        }
        if ticks <= 0 || ticks > rt.remaining {
            return Err(SimulationError::Unschedulable(format!(
                "process {pid} charged {ticks} ticks with {} remaining",
                rt.remaining
            )));
        }

        rt.remaining -= ticks;
        if rt.remaining == 0 {
            rt.state = ProcessState::Completed;
            rt.completion = Some(end);
            log::debug!("t={end}: {pid} completed");
        }
        Ok(())
    }

    /// Whether a process has completed.
    pub fn is_completed(&self, index: usize) -> bool {
        self.runtime[index].state == ProcessState::Completed
    }

    /// Whether every process has completed.
    pub fn all_completed(&self) -> bool {
        self.runtime
            .iter()
            .all(|rt| rt.state == ProcessState::Completed)
    }

    /// Completion time of a process.
    pub fn completion(&self, index: usize) -> Option<i64> {
        self.runtime[index].completion
    }

    fn transition(
        &mut self,
        index: usize,
        from: ProcessState,
        to: ProcessState,
    ) -> Result<(), SimulationError> {
        let processes = self.processes;
        let rt = &mut self.runtime[index];
        if rt.state != from {
            return Err(SimulationError::Unschedulable(format!(
                "process {} cannot move {:?} → {:?} from {:?}",
                processes[index].pid, from, to, rt.state
            )));
        }
        rt.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Process> {
        Process::numbered(&[(3, 2, 0), (0, 4, 0), (3, 1, 0)])
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        let err = ProcessRegistry::new(&[]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));
    }

    #[test]
    fn test_admission_order() {
        let procs = sample();
        let mut reg = ProcessRegistry::new(&procs).unwrap();
        assert_eq!(reg.earliest_arrival(), Some(0));
        assert_eq!(reg.admit_until(0), vec![1]);
        assert_eq!(reg.next_arrival_time(), Some(3));
        assert_eq!(reg.admit_until(5), vec![0, 2]);
        assert_eq!(reg.next_arrival_time(), None);
        assert!(reg.admit_until(10).is_empty());
    }

    #[test]
    fn test_full_lifecycle() {
        let procs = sample();
        let mut reg = ProcessRegistry::new(&procs).unwrap();
        reg.admit_until(0);

        reg.dispatch(1, 0).unwrap();
        reg.execute(1, 1, 1).unwrap();
        reg.preempt(1).unwrap();
        assert_eq!(reg.runtime(1).remaining, 3);
        assert_eq!(reg.runtime(1).state, ProcessState::Ready);

        reg.dispatch(1, 2).unwrap();
        reg.execute(1, 3, 5).unwrap();
        assert!(reg.is_completed(1));
        assert_eq!(reg.completion(1), Some(5));
        assert_eq!(reg.runtime(1).first_start, Some(0));
        assert!(!reg.all_completed());
    }

    #[test]
    fn test_completed_process_cannot_run() {
        let procs = vec![Process::new("P1", 0, 1)];
        let mut reg = ProcessRegistry::new(&procs).unwrap();
        reg.admit_until(0);
        reg.dispatch(0, 0).unwrap();
        reg.execute(0, 1, 1).unwrap();
        assert!(reg.all_completed());
        assert!(reg.dispatch(0, 1).is_err());
        assert!(reg.execute(0, 1, 2).is_err());
        assert!(reg.preempt(0).is_err());
    }

    #[test]
    fn test_unarrived_cannot_dispatch() {
        let procs = sample();
        let mut reg = ProcessRegistry::new(&procs).unwrap();
        assert!(matches!(
            reg.dispatch(0, 0),
            Err(SimulationError::Unschedulable(_))
        ));
    }

    #[test]
    fn test_overcharge_rejected() {
        let procs = vec![Process::new("P1", 0, 2)];
        let mut reg = ProcessRegistry::new(&procs).unwrap();
        reg.admit_until(0);
        reg.dispatch(0, 0).unwrap();
        assert!(reg.execute(0, 3, 3).is_err());
        assert_eq!(reg.runtime(0).remaining, 2);
    }

    #[test]
    fn test_candidates_include_running() {
        let procs = sample();
        let mut reg = ProcessRegistry::new(&procs).unwrap();
        reg.admit_until(3);
        reg.dispatch(1, 0).unwrap();
        reg.execute(1, 2, 2).unwrap();
        let c = reg.candidates();
        let idx: Vec<usize> = c.iter().map(|c| c.index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
        assert_eq!(c[1].remaining, 2);
    }
}
