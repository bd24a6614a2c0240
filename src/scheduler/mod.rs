//! Simulation engine, metrics, and facade.
//!
//! Provides the discrete-event loops for all six CPU scheduling policies,
//! the per-run process registry, and metric evaluation.
//!
//! # Algorithm
//!
//! Rule-driven policies (FCFS, SJF, SRTF, Priority) share one loop that
//! picks the best ready process by a [`RuleChain`](crate::dispatching::RuleChain)
//! and runs it until its completion or, when preemptive, the next arrival.
//! Round Robin uses a FIFO queue and fixed quanta.
//!
//! # Metrics
//!
//! `SimulationMetrics` computes completion, turnaround, waiting, and
//! response per process, plus averages, CPU utilization, and throughput.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

pub mod engine;
mod kpi;
mod registry;
mod simulator;

pub use kpi::{AggregateMetrics, ProcessMetrics, SimulationMetrics};
pub use registry::{ProcessRegistry, ProcessState, RuntimeState};
pub use simulator::{
    ClockOrigin, Policy, PolicyKind, SimulationConfig, SimulationRequest, SimulationResult,
    Simulator,
};
