//! Playback control commands
//!
//! The JSON shape follows the replay control protocol: an `action` tag plus
//! an optional payload, e.g. `{"action": "seek", "time": "2026-01-15T12:00:00"}`.

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use wardops_core::{SimTime, ZoomLevel};

/// Naive layouts accepted after RFC 3339, `T` or space separated
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlaybackCommand {
    Play,
    Pause,
    /// Jump to an absolute simulated time
    Seek {
        #[serde(deserialize_with = "deserialize_sim_time")]
        time: SimTime,
    },
    /// Change the playback multiplier; must be positive
    Speed { value: Decimal },
    /// Switch to the next faster preset speed, wrapping to 1x
    CycleSpeed,
    Zoom { level: ZoomLevel },
    StepForward,
    StepBackward,
    /// Jump to a fraction of the current day
    Scrub { fraction: f64 },
    /// End the session
    Stop,
}

impl PlaybackCommand {
    /// Parse a command from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The `action` name, for logging
    pub fn action(&self) -> &'static str {
        match self {
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Seek { .. } => "seek",
            PlaybackCommand::Speed { .. } => "speed",
            PlaybackCommand::CycleSpeed => "cycle_speed",
            PlaybackCommand::Zoom { .. } => "zoom",
            PlaybackCommand::StepForward => "step_forward",
            PlaybackCommand::StepBackward => "step_backward",
            PlaybackCommand::Scrub { .. } => "scrub",
            PlaybackCommand::Stop => "stop",
        }
    }
}

/// Parse an ISO-8601 timestamp into simulated time
///
/// An explicit offset or `Z` is accepted and dropped: the wall time as
/// written is kept, since simulated time is the unit's local time.
pub fn parse_sim_time(raw: &str) -> Option<SimTime> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn deserialize_sim_time<'de, D>(deserializer: D) -> Result<SimTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sim_time(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}
