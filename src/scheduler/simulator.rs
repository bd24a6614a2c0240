//! Simulation facade.
//!
//! Validates input, dispatches to the selected policy, computes metrics,
//! and returns one immutable result value.
//!
//! # Policies
//!
//! | Policy | Selection | Preemptive |
//! |--------|-----------|------------|
//! | FCFS | arrival | no |
//! | SJF | burst, arrival | no |
//! | SRTF | remaining, arrival | at arrivals |
//! | PRIORITY_NP | priority, arrival | no |
//! | PRIORITY_P | priority, arrival | at arrivals |
//! | ROUND_ROBIN | FIFO queue | every quantum |
//!
//! Full ties always go to the process listed first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dispatching::{rules, RuleChain};
use crate::error::SimulationError;
use crate::models::{Process, Timeline};
use crate::validation::{validate_quantum, ValidationError, ValidationErrorKind};

use super::engine::{run_round_robin, run_rule_driven};
use super::{ProcessRegistry, SimulationMetrics};

/// Policy name as it appears in the external request contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// First-Come, First-Served.
    #[serde(rename = "FCFS")]
    Fcfs,
    /// Shortest Job First (non-preemptive).
    #[serde(rename = "SJF")]
    Sjf,
    /// Shortest Remaining Time First.
    #[serde(rename = "SRTF")]
    Srtf,
    /// Priority, non-preemptive.
    #[serde(rename = "PRIORITY_NP")]
    PriorityNp,
    /// Priority, preemptive.
    #[serde(rename = "PRIORITY_P")]
    PriorityP,
    /// Round Robin.
    #[serde(rename = "ROUND_ROBIN")]
    RoundRobin,
}

impl PolicyKind {
    /// All policies, in display order.
    pub const ALL: [PolicyKind; 6] = [
        PolicyKind::Fcfs,
        PolicyKind::Sjf,
        PolicyKind::Srtf,
        PolicyKind::PriorityNp,
        PolicyKind::PriorityP,
        PolicyKind::RoundRobin,
    ];

    /// Contract name (`"FCFS"`, `"PRIORITY_NP"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Fcfs => "FCFS",
            PolicyKind::Sjf => "SJF",
            PolicyKind::Srtf => "SRTF",
            PolicyKind::PriorityNp => "PRIORITY_NP",
            PolicyKind::PriorityP => "PRIORITY_P",
            PolicyKind::RoundRobin => "ROUND_ROBIN",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS" => Ok(PolicyKind::Fcfs),
            "SJF" => Ok(PolicyKind::Sjf),
            "SRTF" | "SJF_PREEMPTIVE" => Ok(PolicyKind::Srtf),
            "PRIORITY_NP" | "PRIORITY" => Ok(PolicyKind::PriorityNp),
            "PRIORITY_P" | "PRIORITY_PREEMPTIVE" => Ok(PolicyKind::PriorityP),
            "ROUND_ROBIN" | "RR" => Ok(PolicyKind::RoundRobin),
            _ => Err(SimulationError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::UnknownPolicy,
                "policy",
                format!("Unknown scheduling policy: {s}"),
            )])),
        }
    }
}

/// A fully parameterized scheduling policy.
///
/// Serialized as `{"policy": "ROUND_ROBIN", "quantum": 4}` /
/// `{"policy": "FCFS"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum Policy {
    /// First-Come, First-Served.
    #[serde(rename = "FCFS")]
    Fcfs,
    /// Shortest Job First (non-preemptive).
    #[serde(rename = "SJF")]
    Sjf,
    /// Shortest Remaining Time First.
    #[serde(rename = "SRTF")]
    Srtf,
    /// Priority, non-preemptive.
    #[serde(rename = "PRIORITY_NP")]
    PriorityNonPreemptive,
    /// Priority, preemptive.
    #[serde(rename = "PRIORITY_P")]
    PriorityPreemptive,
    /// Round Robin with a time quantum.
    #[serde(rename = "ROUND_ROBIN")]
    RoundRobin {
        /// Maximum contiguous slice per dispatch.
        quantum: i64,
    },
}

impl Policy {
    /// Builds a policy from its contract name and optional quantum.
    ///
    /// `quantum` is required for Round Robin and ignored otherwise.
    pub fn from_kind(kind: PolicyKind, quantum: Option<i64>) -> Result<Self, SimulationError> {
        Ok(match kind {
            PolicyKind::Fcfs => Policy::Fcfs,
            PolicyKind::Sjf => Policy::Sjf,
            PolicyKind::Srtf => Policy::Srtf,
            PolicyKind::PriorityNp => Policy::PriorityNonPreemptive,
            PolicyKind::PriorityP => Policy::PriorityPreemptive,
            PolicyKind::RoundRobin => {
                let quantum = quantum.ok_or_else(|| {
                    SimulationError::InvalidInput(vec![ValidationError::new(
                        ValidationErrorKind::NonPositiveQuantum,
                        "quantum",
                        "Round Robin requires a time quantum",
                    )])
                })?;
                validate_quantum(quantum)?;
                Policy::RoundRobin { quantum }
            }
        })
    }

    /// Contract name of this policy.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fcfs => PolicyKind::Fcfs,
            Policy::Sjf => PolicyKind::Sjf,
            Policy::Srtf => PolicyKind::Srtf,
            Policy::PriorityNonPreemptive => PolicyKind::PriorityNp,
            Policy::PriorityPreemptive => PolicyKind::PriorityP,
            Policy::RoundRobin { .. } => PolicyKind::RoundRobin,
        }
    }

    /// Whether a running process can lose the CPU before completing.
    pub fn is_preemptive(&self) -> bool {
        matches!(
            self,
            Policy::Srtf | Policy::PriorityPreemptive | Policy::RoundRobin { .. }
        )
    }

    /// Selection keys for rule-driven policies; `None` for Round Robin.
    pub fn rule_chain(&self) -> Option<RuleChain> {
        let chain = RuleChain::new();
        let chain = match self {
            Policy::Fcfs => chain.with_rule(rules::Arrival),
            Policy::Sjf => chain.with_rule(rules::ShortestBurst).with_rule(rules::Arrival),
            Policy::Srtf => chain
                .with_rule(rules::ShortestRemaining)
                .with_rule(rules::Arrival),
            Policy::PriorityNonPreemptive | Policy::PriorityPreemptive => chain
                .with_rule(rules::LowestPriority)
                .with_rule(rules::Arrival),
            Policy::RoundRobin { .. } => return None,
        };
        Some(chain)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::RoundRobin { quantum } => write!(f, "ROUND_ROBIN(q={quantum})"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Where the simulation clock starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockOrigin {
    /// Start at t=0; a late first arrival yields a leading idle segment.
    #[default]
    Zero,
    /// Start at the earliest arrival.
    FirstArrival,
}

/// Simulator configuration.
///
/// # Example
///
/// ```
/// use u_cpusched::models::Process;
/// use u_cpusched::scheduler::{ClockOrigin, Policy, SimulationConfig, Simulator};
///
/// let config = SimulationConfig::new().with_origin(ClockOrigin::FirstArrival);
/// let sim = Simulator::new().with_config(config);
/// assert_eq!(sim.config().origin, ClockOrigin::FirstArrival);
///
/// let processes = Process::numbered(&[(4, 2, 0)]);
/// let result = sim.run(&processes, Policy::Fcfs).unwrap();
/// assert_eq!(result.timeline.start(), Some(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Clock origin.
    #[serde(default)]
    pub origin: ClockOrigin,
}

impl SimulationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock origin.
    pub fn with_origin(mut self, origin: ClockOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Input in the external contract shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Processes, in input order.
    pub processes: Vec<Process>,
    /// Policy name.
    pub policy: PolicyKind,
    /// Time quantum; required for Round Robin only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
}

impl SimulationRequest {
    /// Creates a request.
    pub fn new(processes: Vec<Process>, policy: PolicyKind) -> Self {
        Self {
            processes,
            policy,
            quantum: None,
        }
    }

    /// Sets the Round Robin quantum.
    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self
    }
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Policy that produced this result.
    pub policy: Policy,
    /// Execution timeline.
    pub timeline: Timeline,
    /// Per-process and aggregate metrics.
    #[serde(flatten)]
    pub metrics: SimulationMetrics,
}

/// CPU scheduling simulator.
///
/// Stateless apart from its configuration: every call builds a fresh
/// registry, so runs never share mutable state and may execute on
/// different threads.
///
/// # Example
///
/// ```
/// use u_cpusched::models::{Process, Segment};
/// use u_cpusched::scheduler::{Policy, Simulator};
///
/// let processes = Process::numbered(&[(0, 5, 0), (1, 3, 0), (2, 8, 0)]);
/// let result = Simulator::new().run(&processes, Policy::Fcfs).unwrap();
///
/// assert_eq!(result.timeline.segments[1], Segment::process("P2", 5, 8));
/// assert_eq!(result.metrics.waiting_times(), vec![0, 4, 6]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Creates a simulator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the clock origin.
    pub fn with_origin(mut self, origin: ClockOrigin) -> Self {
        self.config.origin = origin;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates `processes` under `policy`.
    ///
    /// # Errors
    /// `InvalidInput` for an invalid process set or quantum. Either a
    /// complete result or an error is returned, never a partial timeline.
    pub fn run(
        &self,
        processes: &[Process],
        policy: Policy,
    ) -> Result<SimulationResult, SimulationError> {
        let result = self.simulate(processes, policy);
        match &result {
            Ok(r) => log::info!(
                "{policy}: {} processes, makespan {}, avg waiting {:.2}",
                processes.len(),
                r.metrics.aggregate.makespan,
                r.metrics.aggregate.avg_waiting
            ),
            Err(SimulationError::InvalidInput(errors)) => {
                log::warn!("{policy}: rejected input ({} errors)", errors.len())
            }
            Err(e) => log::error!("{policy}: {e}"),
        }
        result
    }

    /// Simulates a contract-shaped request.
    pub fn run_request(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        let policy = Policy::from_kind(request.policy, request.quantum)?;
        self.run(&request.processes, policy)
    }

    /// Runs the same process set under several policies.
    ///
    /// Runs are independent; one failure does not affect the others.
    pub fn compare(
        &self,
        processes: &[Process],
        policies: &[Policy],
    ) -> Vec<Result<SimulationResult, SimulationError>> {
        policies
            .iter()
            .map(|&policy| self.run(processes, policy))
            .collect()
    }

    fn simulate(
        &self,
        processes: &[Process],
        policy: Policy,
    ) -> Result<SimulationResult, SimulationError> {
        let quantum_errors = match policy {
            Policy::RoundRobin { quantum } => validate_quantum(quantum).err().unwrap_or_default(),
            _ => Vec::new(),
        };
        let mut registry = match ProcessRegistry::new(processes) {
            Ok(registry) if quantum_errors.is_empty() => registry,
            Ok(_) => return Err(SimulationError::InvalidInput(quantum_errors)),
            Err(SimulationError::InvalidInput(mut errors)) => {
                errors.extend(quantum_errors);
                return Err(SimulationError::InvalidInput(errors));
            }
            Err(e) => return Err(e),
        };

        let origin = match self.config.origin {
            ClockOrigin::Zero => 0,
            ClockOrigin::FirstArrival => registry.earliest_arrival().unwrap_or(0),
        };

        let timeline = match (policy, policy.rule_chain()) {
            (Policy::RoundRobin { quantum }, _) => run_round_robin(&mut registry, quantum, origin)?,
            (_, Some(chain)) => {
                run_rule_driven(&mut registry, &chain, policy.is_preemptive(), origin)?
            }
            (_, None) => {
                return Err(SimulationError::Unschedulable(format!(
                    "no selection rule for {policy}"
                )))
            }
        };

        let metrics = SimulationMetrics::calculate(&timeline, &registry)?;
        Ok(SimulationResult {
            policy,
            timeline,
            metrics,
        })
    }
}
