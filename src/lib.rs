//! CPU scheduling simulation engine.
//!
//! Given a set of processes (arrival, burst, priority) and a scheduling
//! policy, computes the exact execution timeline and the per-process and
//! aggregate performance metrics derived from it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `Owner`, `Segment`, `Timeline`,
//!   `TimelineBuilder`
//! - **`validation`**: Input integrity checks (empty set, duplicate pids,
//!   negative arrivals, non-positive bursts and quanta)
//! - **`dispatching`**: Selection rules and lexicographic rule chains
//! - **`scheduler`**: Process registry, simulation loops, metrics, and the
//!   `Simulator` facade
//! - **`workload`**: Seeded random process sets
//!
//! # Policies
//!
//! FCFS, SJF, SRTF, Priority (non-preemptive and preemptive), and Round
//! Robin. Lower priority values are more urgent; full ties go to the
//! process listed first.
//!
//! # Example
//!
//! ```
//! use u_cpusched::models::Process;
//! use u_cpusched::scheduler::{Policy, Simulator};
//!
//! let processes = Process::numbered(&[(0, 8, 0), (1, 4, 0), (2, 9, 0), (3, 5, 0)]);
//! let result = Simulator::new().run(&processes, Policy::Srtf).unwrap();
//!
//! assert_eq!(result.metrics.get("P3").unwrap().completion, 26);
//! assert!((result.metrics.aggregate.avg_waiting - 6.5).abs() < 1e-10);
//! ```
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod workload;

pub use error::SimulationError;
