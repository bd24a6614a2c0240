//! Timeline (Gantt chart) model.
//!
//! A timeline is the exact execution history of one simulation run: an
//! ordered, gap-free sequence of half-open segments, each owned by a
//! process or by the idle CPU.
//!
//! # Invariants
//! - `segments[i].start < segments[i].end`
//! - `segments[i].end == segments[i + 1].start`
//! - adjacent segments never share an owner (they are merged on append)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimulationError;

/// Owner marker used for idle segments in the external contract.
pub const IDLE_MARKER: &str = "IDLE";

/// Who holds the CPU during a segment.
///
/// Serialized as the pid string, or `"IDLE"` for idle time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Owner {
    /// The CPU runs the process with this pid.
    Process(String),
    /// No process is ready.
    Idle,
}

impl Owner {
    /// Whether this is an idle owner.
    pub fn is_idle(&self) -> bool {
        matches!(self, Owner::Idle)
    }

    /// The pid, if a process owns the segment.
    pub fn pid(&self) -> Option<&str> {
        match self {
            Owner::Process(pid) => Some(pid),
            Owner::Idle => None,
        }
    }
}

impl From<String> for Owner {
    fn from(value: String) -> Self {
        if value == IDLE_MARKER {
            Owner::Idle
        } else {
            Owner::Process(value)
        }
    }
}

impl From<Owner> for String {
    fn from(owner: Owner) -> Self {
        match owner {
            Owner::Process(pid) => pid,
            Owner::Idle => IDLE_MARKER.to_string(),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Process(pid) => f.write_str(pid),
            Owner::Idle => f.write_str(IDLE_MARKER),
        }
    }
}

/// A contiguous interval `[start, end)` owned by one process or idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment owner.
    pub owner: Owner,
    /// Start time (inclusive).
    pub start: i64,
    /// End time (exclusive).
    pub end: i64,
}

impl Segment {
    /// Creates a new segment.
    pub fn new(owner: Owner, start: i64, end: i64) -> Self {
        Self { owner, start, end }
    }

    /// Creates a process-owned segment.
    pub fn process(pid: impl Into<String>, start: i64, end: i64) -> Self {
        Self::new(Owner::Process(pid.into()), start, end)
    }

    /// Creates an idle segment.
    pub fn idle(start: i64, end: i64) -> Self {
        Self::new(Owner::Idle, start, end)
    }

    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// A completed execution timeline.
///
/// Produced only by [`TimelineBuilder::finalize`]; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Ordered, contiguous segments.
    pub segments: Vec<Segment>,
}

impl Timeline {
    /// First segment's start, or `None` for an empty timeline.
    pub fn start(&self) -> Option<i64> {
        self.segments.first().map(|s| s.start)
    }

    /// Last segment's end, or `None` for an empty timeline.
    pub fn end(&self) -> Option<i64> {
        self.segments.last().map(|s| s.end)
    }

    /// Length of the simulated window (end - start).
    pub fn total_time(&self) -> i64 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        }
    }

    /// Time spent running any process.
    pub fn busy_time(&self) -> i64 {
        self.segments
            .iter()
            .filter(|s| !s.owner.is_idle())
            .map(Segment::duration)
            .sum()
    }

    /// Time the CPU spent idle.
    pub fn idle_time(&self) -> i64 {
        self.total_time() - self.busy_time()
    }

    /// All segments owned by a given process.
    pub fn segments_for(&self, pid: &str) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.owner.pid() == Some(pid))
            .collect()
    }

    /// Total CPU time given to a process.
    pub fn executed_time(&self, pid: &str) -> i64 {
        self.segments_for(pid).iter().map(|s| s.duration()).sum()
    }

    /// Time of the first dispatch of a process.
    pub fn first_start(&self, pid: &str) -> Option<i64> {
        self.segments_for(pid).first().map(|s| s.start)
    }

    /// End of the last segment of a process.
    pub fn completion_of(&self, pid: &str) -> Option<i64> {
        self.segments_for(pid).last().map(|s| s.end)
    }

    /// Number of non-idle segments.
    pub fn dispatch_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.owner.is_idle()).count()
    }

    /// Checks positivity, contiguity and the no-adjacent-duplicate rule.
    pub fn is_contiguous(&self) -> bool {
        self.segments.iter().all(|s| s.start < s.end)
            && self
                .segments
                .windows(2)
                .all(|w| w[0].end == w[1].start && w[0].owner != w[1].owner)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the timeline has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Appends segments while enforcing the timeline invariants.
///
/// Every strategy goes through this builder, so contiguity and merging
/// live in one place.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    segments: Vec<Segment>,
    cursor: i64,
}

impl TimelineBuilder {
    /// Starts an empty timeline at `origin`.
    pub fn starting_at(origin: i64) -> Self {
        Self {
            segments: Vec::new(),
            cursor: origin,
        }
    }

    /// End of the last appended segment (or the origin).
    pub fn current_end(&self) -> i64 {
        self.cursor
    }

    /// Appends `[start, end)` for `owner`, merging into the previous
    /// segment when the owner matches.
    ///
    /// # Errors
    /// `Unschedulable` if `end <= start` or `start != current_end()`.
    pub fn append(&mut self, owner: Owner, start: i64, end: i64) -> Result<(), SimulationError> {
        if end <= start {
            return Err(SimulationError::Unschedulable(format!(
                "empty segment [{start}, {end}) for {owner}"
            )));
        }
        if start != self.cursor {
            return Err(SimulationError::Unschedulable(format!(
                "segment for {owner} starts at {start}, timeline ends at {}",
                self.cursor
            )));
        }

        log::trace!("timeline: {owner} [{start}, {end})");

        match self.segments.last_mut() {
            Some(last) if last.owner == owner => last.end = end,
            _ => self.segments.push(Segment::new(owner, start, end)),
        }
        self.cursor = end;
        Ok(())
    }

    /// Appends idle time up to `end`.
    pub fn idle_until(&mut self, end: i64) -> Result<(), SimulationError> {
        self.append(Owner::Idle, self.cursor, end)
    }

    /// Freezes the builder into an immutable timeline.
    pub fn finalize(self) -> Timeline {
        Timeline {
            segments: self.segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_timeline() -> Timeline {
        let mut b = TimelineBuilder::starting_at(0);
        b.idle_until(2).unwrap();
        b.append(Owner::Process("P1".into()), 2, 5).unwrap();
        b.append(Owner::Process("P2".into()), 5, 7).unwrap();
        b.append(Owner::Process("P1".into()), 7, 9).unwrap();
        b.finalize()
    }

    #[test]
    fn test_builder_merges_same_owner() {
        let mut b = TimelineBuilder::starting_at(0);
        b.append(Owner::Process("P1".into()), 0, 1).unwrap();
        b.append(Owner::Process("P1".into()), 1, 4).unwrap();
        let t = b.finalize();
        assert_eq!(t.segments, vec![Segment::process("P1", 0, 4)]);
    }

    #[test]
    fn test_builder_merges_idle() {
        let mut b = TimelineBuilder::starting_at(0);
        b.idle_until(3).unwrap();
        b.idle_until(5).unwrap();
        assert_eq!(b.finalize().segments, vec![Segment::idle(0, 5)]);
    }

    #[test]
    fn test_builder_rejects_gap() {
        let mut b = TimelineBuilder::starting_at(0);
        b.append(Owner::Process("P1".into()), 0, 2).unwrap();
        let err = b.append(Owner::Process("P2".into()), 3, 4).unwrap_err();
        assert!(matches!(err, SimulationError::Unschedulable(_)));
        assert_eq!(b.current_end(), 2);
    }

    #[test]
    fn test_builder_rejects_empty_segment() {
        let mut b = TimelineBuilder::starting_at(4);
        assert!(b.append(Owner::Idle, 4, 4).is_err());
        assert!(b.finalize().is_empty());
    }

    #[test]
    fn test_timeline_queries() {
        let t = sample_timeline();
        assert_eq!(t.start(), Some(0));
        assert_eq!(t.end(), Some(9));
        assert_eq!(t.total_time(), 9);
        assert_eq!(t.busy_time(), 7);
        assert_eq!(t.idle_time(), 2);
        assert_eq!(t.executed_time("P1"), 5);
        assert_eq!(t.first_start("P1"), Some(2));
        assert_eq!(t.completion_of("P1"), Some(9));
        assert_eq!(t.completion_of("P9"), None);
        assert_eq!(t.dispatch_count(), 3);
        assert!(t.is_contiguous());
    }

    #[test]
    fn test_is_contiguous_detects_fragmentation() {
        let t = Timeline {
            segments: vec![Segment::process("P1", 0, 1), Segment::process("P1", 1, 2)],
        };
        assert!(!t.is_contiguous());
    }

    #[test]
    fn test_empty_timeline() {
        let t = Timeline::default();
        assert_eq!(t.total_time(), 0);
        assert_eq!(t.busy_time(), 0);
        assert!(t.is_contiguous());
    }

    #[test]
    fn test_owner_serde() {
        let json = serde_json::to_string(&Segment::idle(0, 3)).unwrap();
        assert_eq!(json, r#"{"owner":"IDLE","start":0,"end":3}"#);

        let seg: Segment = serde_json::from_str(r#"{"owner":"P2","start":3,"end":5}"#).unwrap();
        assert_eq!(seg, Segment::process("P2", 3, 5));
    }
}
