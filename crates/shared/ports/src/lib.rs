//! WardOps Ports
//!
//! Port definitions (traits) for WardOps playback.
//! These define the boundaries between the clock and its consumers.

mod clock;
mod error;

pub use clock::Clock;
pub use error::{ClockError, ClockResult};
