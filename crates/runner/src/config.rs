//! Session configuration
//!
//! Loaded from JSON; every field is optional and falls back to the
//! defaults of the embedded `session_config.json`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use wardops_core::{PlaybackSpeed, SimTime, TimeWindow, ZoomLevel, default_replay_start};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration of one playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulated time the clock starts at (beginning of the replay window)
    pub replay_start: SimTime,
    /// Length of the replay window in hours
    pub replay_length_hours: u32,
    /// Initial playback speed
    pub initial_speed: PlaybackSpeed,
    /// Initial display window
    pub zoom_level: ZoomLevel,
    /// Wall-clock cadence of the tick driver in ms
    pub tick_interval_ms: u64,
    /// Pause and emit `complete` once a tick reaches the end of the window
    pub stop_at_end: bool,
    /// Capacity of the frame broadcast channel
    pub frame_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            replay_start: default_replay_start(),
            replay_length_hours: 24,
            initial_speed: PlaybackSpeed::NORMAL,
            zoom_level: ZoomLevel::Long,
            tick_interval_ms: 1000,
            stop_at_end: true,
            frame_capacity: 1000,
        }
    }
}

impl SessionConfig {
    /// Wall-clock interval between ticks
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    /// The replayed span `[replay_start, replay_start + replay_length_hours)`
    pub fn replay_window(&self) -> Result<TimeWindow, ConfigError> {
        let end = self
            .replay_start
            .checked_add_signed(Duration::hours(i64::from(self.replay_length_hours)))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "replay window of {}h from {} is out of range",
                    self.replay_length_hours, self.replay_start
                ))
            })?;
        Ok(TimeWindow::new(self.replay_start, end))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replay_length_hours == 0 {
            return Err(ConfigError::Invalid(
                "replay_length_hours must be positive".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.frame_capacity == 0 {
            return Err(ConfigError::Invalid(
                "frame_capacity must be positive".to_string(),
            ));
        }
        self.replay_window()?;
        Ok(())
    }
}

/// Load session configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SessionConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<SessionConfig, ConfigError> {
    let config: SessionConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<SessionConfig, ConfigError> {
    let default_config = include_str!("session_config.json");
    load_config_from_str(default_config)
}
