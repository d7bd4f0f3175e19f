use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use wardops_core::{MINUTES_PER_DAY, PlaybackSpeed, SimTime, TimeWindow, ZoomLevel, start_of_day};
use wardops_ports::{Clock, ClockError, ClockResult};

/// Simulated seconds added by one tick at 1x
pub const TICK_SECONDS: i64 = 60;

/// Simulated minutes moved by a discrete step
pub const STEP_MINUTES: i64 = 15;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: f64 = (MINUTES_PER_DAY * 60 * NANOS_PER_SECOND) as f64;

/// Copy of the clock's observable state, as read by display layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    pub current_time: SimTime,
    pub is_playing: bool,
    pub playback_speed: PlaybackSpeed,
    pub zoom_level: ZoomLevel,
}

/// Playback clock over a replayed day
///
/// Mutated only through its own operations. Every operation is defined for
/// every prior state: playing twice, stepping while playing and scrubbing
/// while playing are all ordinary transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    current_time: SimTime,
    is_playing: bool,
    playback_speed: PlaybackSpeed,
    zoom_level: ZoomLevel,
}

impl PlaybackClock {
    /// Create a paused clock at `initial_time`, 1x speed, full-day zoom
    pub fn new(initial_time: SimTime) -> Self {
        Self::with_settings(initial_time, PlaybackSpeed::NORMAL, ZoomLevel::Long)
    }

    /// Create a paused clock with explicit speed and zoom
    pub fn with_settings(initial_time: SimTime, speed: PlaybackSpeed, zoom: ZoomLevel) -> Self {
        Self {
            current_time: initial_time,
            is_playing: false,
            playback_speed: speed,
            zoom_level: zoom,
        }
    }

    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_speed(&self) -> PlaybackSpeed {
        self.playback_speed
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.zoom_level
    }

    pub fn snapshot(&self) -> ClockState {
        ClockState {
            current_time: self.current_time,
            is_playing: self.is_playing,
            playback_speed: self.playback_speed,
            zoom_level: self.zoom_level,
        }
    }

    /// Replace the current time unconditionally
    ///
    /// Times outside the nominal replay day are accepted.
    pub fn set_current_time(&mut self, time: SimTime) {
        self.current_time = time;
    }

    pub fn set_playback_speed(&mut self, speed: PlaybackSpeed) {
        self.playback_speed = speed;
    }

    /// Change the display window; never moves time
    pub fn set_zoom_level(&mut self, zoom: ZoomLevel) {
        self.zoom_level = zoom;
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Move forward 15 simulated minutes, regardless of speed or playing state
    pub fn step_forward(&mut self) -> ClockResult<SimTime> {
        self.shift(Duration::minutes(STEP_MINUTES))
    }

    /// Move back 15 simulated minutes, regardless of speed or playing state
    pub fn step_backward(&mut self) -> ClockResult<SimTime> {
        self.shift(-Duration::minutes(STEP_MINUTES))
    }

    /// Jump to a position within the current day
    ///
    /// `0.0` is local midnight, `1.0` the following midnight. Fractions outside
    /// `[0, 1]` extrapolate past the day boundary instead of clamping.
    pub fn scrub_to_fraction(&mut self, fraction: f64) -> ClockResult<SimTime> {
        if !fraction.is_finite() {
            return Err(ClockError::InvalidFraction(fraction));
        }

        let nanos = (fraction * NANOS_PER_DAY).round();
        if nanos.abs() >= i64::MAX as f64 {
            return Err(ClockError::OutOfRange(format!(
                "scrub fraction {fraction} exceeds the representable range"
            )));
        }

        let target = self
            .start_of_day()
            .checked_add_signed(Duration::nanoseconds(nanos as i64))
            .ok_or_else(|| {
                ClockError::OutOfRange(format!("scrub fraction {fraction} from {}", self.current_time))
            })?;

        self.set_current_time(target);
        Ok(target)
    }

    /// Simulated time one tick adds at the current speed (`60s * speed`)
    pub fn tick_advance(&self) -> ClockResult<Duration> {
        let base = Decimal::from(TICK_SECONDS * NANOS_PER_SECOND);
        base.checked_mul(self.playback_speed.value())
            .and_then(|nanos| nanos.round().to_i64())
            .map(Duration::nanoseconds)
            .ok_or_else(|| {
                ClockError::OutOfRange(format!("tick at speed {}", self.playback_speed))
            })
    }

    /// Apply one advancement step
    ///
    /// Does not consult `is_playing`; the tick driver only calls this while playing.
    pub fn tick(&mut self) -> ClockResult<SimTime> {
        let advance = self.tick_advance()?;
        self.shift(advance)
    }

    /// Local midnight of the day containing the current time
    pub fn start_of_day(&self) -> SimTime {
        start_of_day(self.current_time)
    }

    /// The midnight following [`Self::start_of_day`]
    pub fn end_of_day(&self) -> ClockResult<SimTime> {
        self.start_of_day()
            .checked_add_signed(Duration::minutes(MINUTES_PER_DAY))
            .ok_or_else(|| ClockError::OutOfRange(format!("end of day for {}", self.current_time)))
    }

    /// Position of the current time within its day, in `[0, 1)`
    pub fn day_fraction(&self) -> f64 {
        let elapsed = self.current_time - self.start_of_day();
        elapsed.num_nanoseconds().unwrap_or_default() as f64 / NANOS_PER_DAY
    }

    /// Display window for the zoom level
    ///
    /// Centred on the current time and shifted to stay inside the current day.
    pub fn visible_window(&self) -> ClockResult<TimeWindow> {
        let day = TimeWindow::new(self.start_of_day(), self.end_of_day()?);
        let span = self.zoom_level.window();
        if span >= day.duration() {
            return Ok(day);
        }

        let latest_start = day.end - span;
        let centred = self
            .current_time
            .checked_sub_signed(span / 2)
            .unwrap_or(day.start);
        let start = centred.clamp(day.start, latest_start);
        Ok(TimeWindow::new(start, start + span))
    }

    fn shift(&mut self, delta: Duration) -> ClockResult<SimTime> {
        let target = self
            .current_time
            .checked_add_signed(delta)
            .ok_or_else(|| {
                ClockError::OutOfRange(format!("{} shifted by {delta}", self.current_time))
            })?;
        self.set_current_time(target);
        Ok(target)
    }
}

impl Clock for PlaybackClock {
    fn now(&self) -> SimTime {
        self.current_time
    }

    fn name(&self) -> &str {
        "PlaybackClock"
    }
}
