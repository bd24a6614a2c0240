//! Simulation performance metrics.
//!
//! Computes per-process and aggregate scheduling indicators from a
//! completed timeline and the registry that produced it.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround | completion - arrival |
//! | Waiting | turnaround - burst |
//! | Response | first dispatch - arrival |
//! | CPU Utilization | busy_time / total_time |
//! | Throughput | n / total_time |
//!
//! `total_time` spans the whole timeline (first segment start to last
//! segment end), idle time included.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::SimulationError;
use crate::models::Timeline;

use super::ProcessRegistry;

/// Metrics of a single process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub pid: String,
    /// Arrival time (echoed from input).
    pub arrival: i64,
    /// Burst time (echoed from input).
    pub burst: i64,
    /// Priority (echoed from input).
    pub priority: i32,
    /// Time the process finished.
    pub completion: i64,
    /// completion - arrival.
    pub turnaround: i64,
    /// turnaround - burst.
    pub waiting: i64,
    /// first dispatch - arrival.
    pub response: i64,
}

/// Aggregate metrics of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean response time.
    pub avg_response: f64,
    /// busy_time / total_time, in (0, 1].
    pub cpu_utilization: f64,
    /// Completed processes per time unit.
    pub throughput: f64,
    /// Smallest waiting time.
    pub min_waiting: i64,
    /// Largest waiting time.
    pub max_waiting: i64,
    /// Latest completion time.
    pub makespan: i64,
    /// Length of the simulated window.
    pub total_time: i64,
    /// Time spent running processes.
    pub busy_time: i64,
    /// Time spent idle.
    pub idle_time: i64,
    /// Number of non-idle timeline segments.
    pub dispatch_count: usize,
}

/// Full metrics of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Per-process rows, in input order.
    #[serde(rename = "per_process_metrics")]
    pub per_process: Vec<ProcessMetrics>,
    /// Aggregates over all processes.
    #[serde(rename = "aggregate_metrics")]
    pub aggregate: AggregateMetrics,
}

impl SimulationMetrics {
    /// Computes metrics from a finished run.
    ///
    /// # Errors
    /// - `DegenerateRun` if the timeline covers zero time.
    /// - `Unschedulable` if a process never completed.
    pub fn calculate(
        timeline: &Timeline,
        registry: &ProcessRegistry<'_>,
    ) -> Result<Self, SimulationError> {
        let total_time = timeline.total_time();
        if total_time <= 0 {
            return Err(SimulationError::DegenerateRun);
        }

        let mut per_process = Vec::with_capacity(registry.len());
        for (i, p) in registry.processes().iter().enumerate() {
            let completion = registry.completion(i).ok_or_else(|| {
                SimulationError::Unschedulable(format!("process {} never completed", p.pid))
            })?;
            let first_start = registry.runtime(i).first_start.unwrap_or(completion);
            let turnaround = completion - p.arrival;

            per_process.push(ProcessMetrics {
                pid: p.pid.clone(),
                arrival: p.arrival,
                burst: p.burst,
                priority: p.priority,
                completion,
                turnaround,
                waiting: turnaround - p.burst,
                response: first_start - p.arrival,
            });
        }

        if per_process.is_empty() {
            return Err(SimulationError::Unschedulable(
                "no processes to measure".to_string(),
            ));
        }

        let n = per_process.len() as f64;
        let mean = |f: fn(&ProcessMetrics) -> i64| -> f64 {
            per_process.iter().map(|m| f(m) as f64).sum::<f64>() / n
        };
        let busy_time = timeline.busy_time();

        let aggregate = AggregateMetrics {
            avg_waiting: mean(|m| m.waiting),
            avg_turnaround: mean(|m| m.turnaround),
            avg_response: mean(|m| m.response),
            cpu_utilization: busy_time as f64 / total_time as f64,
            throughput: n / total_time as f64,
            min_waiting: per_process.iter().map(|m| m.waiting).min().unwrap_or(0),
            max_waiting: per_process.iter().map(|m| m.waiting).max().unwrap_or(0),
            makespan: per_process.iter().map(|m| m.completion).max().unwrap_or(0),
            total_time,
            busy_time,
            idle_time: total_time - busy_time,
            dispatch_count: timeline.dispatch_count(),
        };

        Ok(Self {
            per_process,
            aggregate,
        })
    }

    /// Finds the row for a given process.
    pub fn get(&self, pid: &str) -> Option<&ProcessMetrics> {
        self.per_process.iter().find(|m| m.pid == pid)
    }

    /// Waiting times in input order.
    pub fn waiting_times(&self) -> Vec<i64> {
        self.per_process.iter().map(|m| m.waiting).collect()
    }

    /// Rows ordered by pid for display, numerically aware (`P2` < `P10`).
    pub fn sorted_by_pid(&self) -> Vec<&ProcessMetrics> {
        let mut rows: Vec<&ProcessMetrics> = self.per_process.iter().collect();
        rows.sort_by(|a, b| natural_cmp(&a.pid, &b.pid));
        rows
    }
}

/// Compares identifiers by non-numeric prefix, then trailing number.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    fn split(s: &str) -> (&str, Option<u64>) {
        let prefix = s.trim_end_matches(|c: char| c.is_ascii_digit());
        (prefix, s[prefix.len()..].parse().ok())
    }
    let (pa, na) = split(a);
    let (pb, nb) = split(b);
    pa.cmp(pb).then(na.cmp(&nb)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::{rules, RuleChain};
    use crate::models::{Process, Segment};
    use crate::scheduler::engine::run_rule_driven;

    fn fcfs_run(procs: &[Process]) -> SimulationMetrics {
        let mut reg = ProcessRegistry::new(procs).unwrap();
        let chain = RuleChain::new().with_rule(rules::Arrival);
        let timeline = run_rule_driven(&mut reg, &chain, false, 0).unwrap();
        SimulationMetrics::calculate(&timeline, &reg).unwrap()
    }

    #[test]
    fn test_metrics_basic() {
        let procs = Process::numbered(&[(0, 5, 0), (1, 3, 0), (2, 8, 0)]);
        let m = fcfs_run(&procs);

        assert_eq!(m.waiting_times(), vec![0, 4, 6]);
        let p2 = m.get("P2").unwrap();
        assert_eq!(p2.completion, 8);
        assert_eq!(p2.turnaround, 7);
        assert_eq!(p2.response, 4);

        assert!((m.aggregate.avg_waiting - 10.0 / 3.0).abs() < 1e-10);
        assert!((m.aggregate.avg_turnaround - (5.0 + 7.0 + 14.0) / 3.0).abs() < 1e-10);
        assert!((m.aggregate.cpu_utilization - 1.0).abs() < 1e-10);
        assert!((m.aggregate.throughput - 3.0 / 16.0).abs() < 1e-10);
        assert_eq!(m.aggregate.min_waiting, 0);
        assert_eq!(m.aggregate.max_waiting, 6);
        assert_eq!(m.aggregate.makespan, 16);
        assert_eq!(m.aggregate.dispatch_count, 3);
    }

    #[test]
    fn test_metrics_with_idle() {
        let procs = Process::numbered(&[(0, 2, 0), (6, 2, 0)]);
        let m = fcfs_run(&procs);
        assert_eq!(m.aggregate.total_time, 8);
        assert_eq!(m.aggregate.busy_time, 4);
        assert_eq!(m.aggregate.idle_time, 4);
        assert!((m.aggregate.cpu_utilization - 0.5).abs() < 1e-10);
        assert!((m.aggregate.throughput - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_run() {
        let procs = Process::numbered(&[(0, 1, 0)]);
        let reg = ProcessRegistry::new(&procs).unwrap();
        let err = SimulationMetrics::calculate(&Timeline::default(), &reg).unwrap_err();
        assert_eq!(err, SimulationError::DegenerateRun);
    }

    #[test]
    fn test_incomplete_run_rejected() {
        let procs = Process::numbered(&[(0, 1, 0)]);
        let reg = ProcessRegistry::new(&procs).unwrap();
        let timeline = Timeline {
            segments: vec![Segment::idle(0, 1)],
        };
        let err = SimulationMetrics::calculate(&timeline, &reg).unwrap_err();
        assert!(matches!(err, SimulationError::Unschedulable(_)));
    }

    #[test]
    fn test_sorted_by_pid_is_numeric() {
        let rows: Vec<(i64, i64, i32)> = (0..11).map(|i| (i, 1, 0)).collect();
        let procs: Vec<Process> = Process::numbered(&rows).into_iter().rev().collect();
        let m = fcfs_run(&procs);
        let order: Vec<&str> = m.sorted_by_pid().iter().map(|r| r.pid.as_str()).collect();
        assert_eq!(order[1], "P2");
        assert_eq!(order[10], "P11");
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("P2", "P10"), Ordering::Less);
        assert_eq!(natural_cmp("A1", "B0"), Ordering::Less);
        assert_eq!(natural_cmp("P1", "P1"), Ordering::Equal);
        assert_eq!(natural_cmp("job", "job1"), Ordering::Less);
    }
}
