use thiserror::Error;

/// Domain-level errors for playback operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(String),

    #[error("Invalid scrub fraction: {0}")]
    InvalidFraction(f64),

    #[error("Simulated time out of range: {0}")]
    OutOfRange(String),

    #[error("Playback session is closed")]
    SessionClosed,
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;
