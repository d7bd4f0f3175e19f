//! Frames broadcast by a playback session to its subscribers

use serde::{Deserialize, Serialize};
use wardops_clock::ClockState;
use wardops_core::{SessionId, SimTime};

use crate::delta::ReplayDelta;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackFrame {
    /// Simulated time advanced by one tick
    Tick {
        session_id: SessionId,
        timestamp: SimTime,
        /// Markers crossed by this tick and the bed changes they imply
        delta: ReplayDelta,
    },
    /// State after an applied command
    State {
        session_id: SessionId,
        state: ClockState,
    },
    /// Replay reached the end of its window or was stopped
    Complete {
        session_id: SessionId,
        message: String,
    },
    /// Playback failed and was paused
    Error {
        session_id: SessionId,
        message: String,
    },
}

impl PlaybackFrame {
    pub fn tick(session_id: SessionId, timestamp: SimTime, delta: ReplayDelta) -> Self {
        PlaybackFrame::Tick {
            session_id,
            timestamp,
            delta,
        }
    }

    pub fn state(session_id: SessionId, state: ClockState) -> Self {
        PlaybackFrame::State { session_id, state }
    }

    pub fn complete(session_id: SessionId, message: impl Into<String>) -> Self {
        PlaybackFrame::Complete {
            session_id,
            message: message.into(),
        }
    }

    pub fn error(session_id: SessionId, message: impl Into<String>) -> Self {
        PlaybackFrame::Error {
            session_id,
            message: message.into(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            PlaybackFrame::Tick { session_id, .. }
            | PlaybackFrame::State { session_id, .. }
            | PlaybackFrame::Complete { session_id, .. }
            | PlaybackFrame::Error { session_id, .. } => *session_id,
        }
    }

    /// Serialize for a text transport
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
