//! Discrete-event simulation loops.
//!
//! # Algorithm
//!
//! The clock jumps between decision points instead of stepping tick by
//! tick:
//!
//! 1. Admit every process whose arrival is `<= clock`.
//! 2. If nothing is ready, emit one idle segment up to the next arrival.
//! 3. Otherwise pick a process and run it until the next decision point:
//!    - non-preemptive rules: its completion
//!    - preemptive rules: its completion or the next arrival, whichever
//!      comes first (the pick is re-evaluated there, and a running process
//!      that is still the best simply continues; the builder merges it)
//!    - Round Robin: `min(remaining, quantum)`
//!
//! Preemptive rule chains re-evaluate the running process alongside the
//! ready set. Its key only shrinks while it runs (SRTF) or stays fixed
//! (priority), so re-evaluating at arrivals alone is exact.
//!
//! # Complexity
//! O(e * n) for e decision points and n processes; e <= 2n for rule-driven
//! policies.

use std::collections::VecDeque;

use crate::dispatching::RuleChain;
use crate::error::SimulationError;
use crate::models::{Owner, Timeline, TimelineBuilder};
use crate::validation::validate_quantum;

use super::ProcessRegistry;

/// Runs a rule-driven policy (FCFS, SJF, SRTF, Priority).
///
/// # Arguments
/// * `registry` - Fresh registry for this run.
/// * `chain` - Selection keys, most significant first.
/// * `preemptive` - Re-evaluate at every arrival instead of only at completions.
/// * `origin` - Clock value at which the timeline starts.
pub fn run_rule_driven(
    registry: &mut ProcessRegistry<'_>,
    chain: &RuleChain,
    preemptive: bool,
    origin: i64,
) -> Result<Timeline, SimulationError> {
    ensure_nonempty(registry)?;

    let mut builder = TimelineBuilder::starting_at(origin);
    let mut clock = origin;
    let mut running: Option<usize> = None;

    while !registry.all_completed() {
        registry.admit_until(clock);

        let Some(pick) = chain.select_best(&registry.candidates()) else {
            clock = idle_to_next_arrival(registry, &mut builder, clock)?;
            continue;
        };

        if running != Some(pick) {
            if let Some(prev) = running.take() {
                log::debug!(
                    "t={clock}: {} preempted by {}",
                    registry.process(prev).pid,
                    registry.process(pick).pid
                );
                registry.preempt(prev)?;
            }
            log::debug!("t={clock}: dispatch {}", registry.process(pick).pid);
            registry.dispatch(pick, clock)?;
            running = Some(pick);
        }

        let mut until = clock + registry.runtime(pick).remaining;
        if preemptive {
            if let Some(next) = registry.next_arrival_time() {
                until = until.min(next);
            }
        }

        registry.execute(pick, until - clock, until)?;
        builder.append(Owner::Process(registry.process(pick).pid.clone()), clock, until)?;
        clock = until;

        if registry.is_completed(pick) {
            running = None;
        }
    }

    Ok(builder.finalize())
}

/// Runs Round Robin with the given time quantum.
///
/// The ready queue is FIFO. A process whose slice expires goes to the
/// tail *after* any process that arrived during (or at the end of) that
/// slice.
///
/// # Errors
/// `InvalidInput` if `quantum <= 0`.
pub fn run_round_robin(
    registry: &mut ProcessRegistry<'_>,
    quantum: i64,
    origin: i64,
) -> Result<Timeline, SimulationError> {
    validate_quantum(quantum)?;
    ensure_nonempty(registry)?;

    let mut builder = TimelineBuilder::starting_at(origin);
    let mut clock = origin;
    let mut queue: VecDeque<usize> = VecDeque::new();

    while !registry.all_completed() {
        queue.extend(registry.admit_until(clock));

        let Some(pick) = queue.pop_front() else {
            clock = idle_to_next_arrival(registry, &mut builder, clock)?;
            continue;
        };

        registry.dispatch(pick, clock)?;
        let slice = registry.runtime(pick).remaining.min(quantum);
        let end = clock + slice;
        log::debug!(
            "t={clock}: dispatch {} for {slice}",
            registry.process(pick).pid
        );

        registry.execute(pick, slice, end)?;
        builder.append(Owner::Process(registry.process(pick).pid.clone()), clock, end)?;
        clock = end;

        queue.extend(registry.admit_until(clock));
        if !registry.is_completed(pick) {
            registry.preempt(pick)?;
            queue.push_back(pick);
        }
    }

    Ok(builder.finalize())
}

fn ensure_nonempty(registry: &ProcessRegistry<'_>) -> Result<(), SimulationError> {
    if registry.is_empty() {
        return Err(SimulationError::Unschedulable(
            "no processes to schedule".to_string(),
        ));
    }
    Ok(())
}

/// Emits an idle segment up to the next arrival and returns the new clock.
fn idle_to_next_arrival(
    registry: &ProcessRegistry<'_>,
    builder: &mut TimelineBuilder,
    clock: i64,
) -> Result<i64, SimulationError> {
    let next = registry.next_arrival_time().ok_or_else(|| {
        SimulationError::Unschedulable(format!(
            "ready set empty at t={clock} with no pending arrivals"
        ))
    })?;
    log::debug!("t={clock}: cpu idle until {next}");
    builder.idle_until(next)?;
    Ok(next)
}
