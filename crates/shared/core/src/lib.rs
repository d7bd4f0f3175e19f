//! WardOps Core Domain
//!
//! Pure value types for timeline playback of a replayed hospital day.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod playback;
pub mod values;

// Re-export commonly used types at crate root
pub use playback::{PlaybackSpeed, ZoomLevel};
pub use values::{
    MINUTES_PER_DAY, SessionId, SimTime, TimeWindow, default_replay_start, start_of_day,
};
