//! WardOps Playback Clock
//!
//! A virtual "current time" cursor over one replayed day:
//!
//! ```text
//!  00:00                  current_time                    24:00
//!    |-------------------------[*]----------------------------|
//!              |<---- visible_window (zoom) ---->|
//!
//!  tick()           +60s * speed
//!  step_forward()   +15 min
//!  step_backward()  -15 min
//!  scrub(f)         start_of_day + f * 1440 min
//! ```
//!
//! The clock owns no timer. Whatever drives playback calls [`PlaybackClock::tick`]
//! at its own cadence while [`PlaybackClock::is_playing`] is true, which keeps the
//! advancement arithmetic testable without waiting on real time.
//!
//! ## Usage
//!
//! ```ignore
//! use wardops_clock::PlaybackClock;
//! use wardops_core::{PlaybackSpeed, default_replay_start};
//!
//! let mut clock = PlaybackClock::new(default_replay_start());
//! clock.set_playback_speed(PlaybackSpeed::PRESETS[2]); // 5x
//! clock.play();
//! clock.tick()?;                                        // +5 minutes
//! clock.scrub_to_fraction(0.5)?;                        // midday
//! ```

mod playback;

pub use playback::{ClockState, PlaybackClock, STEP_MINUTES, TICK_SECONDS};

// Re-export the Clock trait for convenience
pub use wardops_ports::Clock;
