//! Simulation domain models.
//!
//! Provides the input record (`Process`) and the output timeline types
//! shared by every scheduling policy.
//!
//! # Domain Mappings
//!
//! | u-cpusched | Gantt chart | OS textbook |
//! |------------|-------------|-------------|
//! | Process | Row label | PCB / job |
//! | Segment | Bar | CPU burst slice |
//! | Timeline | Chart | Execution trace |

mod process;
mod timeline;

pub use process::Process;
pub use timeline::{Owner, Segment, Timeline, TimelineBuilder, IDLE_MARKER};
