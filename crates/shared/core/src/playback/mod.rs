mod speed;
mod zoom;

pub use speed::PlaybackSpeed;
pub use zoom::ZoomLevel;
