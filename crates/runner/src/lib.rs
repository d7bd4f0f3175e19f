//! WardOps Runner - Timeline Playback Sessions
//!
//! Drives the playback clock for replay of a historical hospital day:
//!
//! - **Config**: session settings loaded from JSON
//! - **Session**: owns one clock plus its tick driver
//! - **Commands**: play / pause / seek / speed / zoom / step / scrub / stop
//! - **Frames**: tick, state, completion and error messages for subscribers
//! - **Markers**: operational events reported as ticks cross them
//! - **Deltas**: bed status changes derived from crossed markers
//! - **Registry**: active sessions keyed by id
//!
//! ## Architecture
//!
//! ```text
//!   PlaybackCommand (JSON)          SessionRegistry
//!            │                            │ connect / disconnect
//!            ▼                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                   PlaybackSession                    │
//! │                                                      │
//! │   Mutex ┌───────────────┐   ┌─────────────────────┐  │
//! │         │ PlaybackClock │◄──│ TickerGuard (tokio) │  │
//! │         └───────────────┘   └─────────────────────┘  │
//! │                 │                     │ every tick    │
//! │                 │               MarkerTrack.between   │
//! └─────────────────┼─────────────────────┼──────────────┘
//!                   ▼                     ▼
//!            broadcast::Sender<PlaybackFrame>
//!                        │
//!                        ▼
//!               display layer subscribers
//! ```

pub mod command;
pub mod config;
pub mod delta;
pub mod frame;
pub mod markers;
pub mod registry;
pub mod session;
pub mod ticker;

// Re-export main types
pub use command::PlaybackCommand;
pub use config::{
    ConfigError, SessionConfig, load_config, load_config_from_str, load_default_config,
};
pub use delta::{BedChange, BedStatus, ReplayDelta};
pub use frame::PlaybackFrame;
pub use markers::{EventMarker, MarkerTrack};
pub use registry::SessionRegistry;
pub use session::PlaybackSession;
pub use ticker::TickerGuard;

// Re-export the clock types consumers read from frames
pub use wardops_clock::{ClockState, PlaybackClock};
