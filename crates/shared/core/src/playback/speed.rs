use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Playback speed multiplier applied to simulated time per tick
///
/// Always strictly positive. Stored as an exact decimal so repeated ticks
/// never accumulate floating point drift. On the wire it is a JSON number,
/// the same form the `speed` command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct PlaybackSpeed(Decimal);

impl PlaybackSpeed {
    /// Real-time replay (1x)
    pub const NORMAL: PlaybackSpeed = PlaybackSpeed(Decimal::ONE);

    /// Speeds offered by the timeline toggle buttons
    pub const PRESETS: [PlaybackSpeed; 4] = [
        PlaybackSpeed(Decimal::ONE),
        PlaybackSpeed(Decimal::TWO),
        PlaybackSpeed(Decimal::from_parts(5, 0, 0, false, 0)),
        PlaybackSpeed(Decimal::TEN),
    ];

    /// Create a speed; `None` unless `value` is strictly positive
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    /// Create a speed from a float; rejects NaN, infinities and non-positive values
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64_retain(value).and_then(Self::new)
    }

    /// The multiplier value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whether this speed is one of the curated presets
    pub fn is_preset(&self) -> bool {
        Self::PRESETS.contains(self)
    }

    /// The next faster preset, wrapping back to the slowest one
    pub fn next_preset(&self) -> Self {
        Self::PRESETS
            .iter()
            .copied()
            .find(|preset| preset > self)
            .unwrap_or(Self::NORMAL)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<Decimal> for PlaybackSpeed {
    type Error = String;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("playback speed must be positive, got {value}"))
    }
}

impl Serialize for PlaybackSpeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.fract().is_zero() {
            if let Some(whole) = self.0.to_u64() {
                return serializer.serialize_u64(whole);
            }
        }
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0.normalize())
    }
}
