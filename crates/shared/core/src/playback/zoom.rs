use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Width of the timeline display window
///
/// Affects rendering only; never moves simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    /// 6 hour window
    Short,
    /// 12 hour window
    Medium,
    /// Whole day
    #[default]
    Long,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 3] = [ZoomLevel::Short, ZoomLevel::Medium, ZoomLevel::Long];

    /// Window width in hours
    pub fn hours(&self) -> i64 {
        match self {
            ZoomLevel::Short => 6,
            ZoomLevel::Medium => 12,
            ZoomLevel::Long => 24,
        }
    }

    /// Window width as a duration
    pub fn window(&self) -> Duration {
        Duration::hours(self.hours())
    }
}
