//! Replay deltas - what changed on the unit during one tick
//!
//! Bed changes are derived from the markers a tick crossed, in marker order,
//! so a subscriber can replay bed occupancy without reloading the unit:
//!
//! ```text
//!   bed_assignment ──► occupied (patient kept)
//!   discharge      ──► empty
//!   cleaning_start ──► cleaning
//!   cleaning_end   ──► empty
//! ```

use serde::{Deserialize, Serialize};

use crate::markers::EventMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedStatus {
    Occupied,
    Empty,
    Cleaning,
}

/// New status of one bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedChange {
    pub bed_id: u64,
    pub status: BedStatus,
    /// Occupying patient; always `None` unless the bed is occupied
    pub patient_id: Option<u64>,
}

impl BedChange {
    /// The bed change a marker implies, if any
    ///
    /// Only bed lifecycle events that name a bed produce a change.
    pub fn from_marker(marker: &EventMarker) -> Option<Self> {
        let bed_id = marker.bed_id?;
        let (status, patient_id) = match marker.kind.as_str() {
            "bed_assignment" => (BedStatus::Occupied, marker.patient_id),
            "discharge" | "cleaning_end" => (BedStatus::Empty, None),
            "cleaning_start" => (BedStatus::Cleaning, None),
            _ => return None,
        };
        Some(Self {
            bed_id,
            status,
            patient_id,
        })
    }
}

/// Payload of a tick frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayDelta {
    pub bed_changes: Vec<BedChange>,
    pub event_markers: Vec<EventMarker>,
}

impl ReplayDelta {
    pub fn from_markers(markers: &[EventMarker]) -> Self {
        Self {
            bed_changes: markers.iter().filter_map(BedChange::from_marker).collect(),
            event_markers: markers.to_vec(),
        }
    }
}
