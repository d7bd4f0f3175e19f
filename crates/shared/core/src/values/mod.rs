use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Simulated time: wall time of the replayed day, local to the hospital unit
pub type SimTime = NaiveDateTime;

/// Length of one replayed calendar day in minutes
pub const MINUTES_PER_DAY: i64 = 1440;

/// Start of the default replay day (2026-01-15T00:00:00)
pub fn default_replay_start() -> SimTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Local midnight of the day containing `time`
pub fn start_of_day(time: SimTime) -> SimTime {
    time.date().and_time(NaiveTime::MIN)
}

/// Half-open span of simulated time `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: SimTime,
    pub end: SimTime,
}

impl TimeWindow {
    pub fn new(start: SimTime, end: SimTime) -> Self {
        Self { start, end }
    }

    /// Length of the window (negative if `end` precedes `start`)
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `time` falls inside `[start, end)`
    pub fn contains(&self, time: SimTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// Identifier of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
