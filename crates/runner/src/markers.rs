//! Event markers - operational events pinned to the timeline
//!
//! Markers are supplied by the caller (the data layer) and kept sorted so
//! tick frames can report the markers a tick crossed and the display layer
//! can ask for the markers inside its visible window.

use serde::{Deserialize, Serialize};
use wardops_core::{SimTime, TimeWindow};
use wardops_ports::Clock;

/// One timestamped operational event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub id: u64,
    /// Event type, e.g. `arrival`, `bed_assignment`, `discharge`
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: SimTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_id: Option<u64>,
    /// Free-form event payload recorded with the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl EventMarker {
    pub fn new(id: u64, kind: impl Into<String>, timestamp: SimTime) -> Self {
        Self {
            id,
            kind: kind.into(),
            timestamp,
            patient_id: None,
            bed_id: None,
            data: None,
        }
    }

    pub fn with_patient(mut self, patient_id: u64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn with_bed(mut self, bed_id: u64) -> Self {
        self.bed_id = Some(bed_id);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Markers sorted by timestamp
#[derive(Debug, Clone, Default)]
pub struct MarkerTrack {
    markers: Vec<EventMarker>,
}

impl MarkerTrack {
    /// Build a track; markers sharing a timestamp keep their input order
    pub fn new(mut markers: Vec<EventMarker>) -> Self {
        markers.sort_by_key(|m| m.timestamp);
        Self { markers }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventMarker> {
        self.markers.iter()
    }

    /// Markers with `after < timestamp <= until`
    pub fn between(&self, after: SimTime, until: SimTime) -> &[EventMarker] {
        let lo = self.markers.partition_point(|m| m.timestamp <= after);
        let hi = self.markers.partition_point(|m| m.timestamp <= until);
        if hi <= lo {
            return &[];
        }
        &self.markers[lo..hi]
    }

    /// Markers inside `[window.start, window.end)`
    pub fn visible(&self, window: TimeWindow) -> &[EventMarker] {
        let lo = self.markers.partition_point(|m| m.timestamp < window.start);
        let hi = self.markers.partition_point(|m| m.timestamp < window.end);
        if hi <= lo {
            return &[];
        }
        &self.markers[lo..hi]
    }

    /// Up to `limit` markers strictly after the clock's current time
    pub fn upcoming(&self, clock: &dyn Clock, limit: usize) -> &[EventMarker] {
        let now = clock.now();
        let lo = self.markers.partition_point(|m| m.timestamp <= now);
        let hi = lo.saturating_add(limit).min(self.markers.len());
        &self.markers[lo..hi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wardops_clock::PlaybackClock;

    fn at(h: u32, m: u32) -> SimTime {
        NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn track() -> MarkerTrack {
        MarkerTrack::new(vec![
            EventMarker::new(3, "discharge", at(9, 0)).with_patient(7).with_bed(2),
            EventMarker::new(1, "arrival", at(8, 0)).with_patient(7),
            EventMarker::new(2, "bed_assignment", at(8, 30)).with_patient(7).with_bed(2),
            EventMarker::new(4, "arrival", at(9, 0)).with_patient(8),
        ])
    }

    fn ids(markers: &[EventMarker]) -> Vec<u64> {
        markers.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_sorted_on_construction() {
        let track = track();
        assert_eq!(ids(&track.iter().cloned().collect::<Vec<_>>()), vec![1, 2, 3, 4]);
        assert_eq!(track.len(), 4);
    }

    #[test]
    fn test_between_is_half_open() {
        let track = track();
        assert_eq!(ids(track.between(at(8, 0), at(8, 30))), vec![2]);
        assert_eq!(ids(track.between(at(7, 59), at(9, 0))), vec![1, 2, 3, 4]);
        assert!(track.between(at(9, 0), at(10, 0)).is_empty());
    }

    #[test]
    fn test_between_reversed_is_empty() {
        let track = track();
        assert!(track.between(at(10, 0), at(8, 0)).is_empty());
    }

    #[test]
    fn test_visible_window() {
        let track = track();
        let window = TimeWindow::new(at(8, 30), at(9, 0));
        assert_eq!(ids(track.visible(window)), vec![2]);
    }

    #[test]
    fn test_upcoming_from_clock() {
        let track = track();
        let clock = PlaybackClock::new(at(8, 0));
        assert_eq!(ids(track.upcoming(&clock, 2)), vec![2, 3]);
        assert_eq!(ids(track.upcoming(&clock, 10)), vec![2, 3, 4]);
    }

    #[test]
    fn test_upcoming_unbounded_limit() {
        let track = track();
        let clock = PlaybackClock::new(at(8, 30));
        assert_eq!(ids(track.upcoming(&clock, usize::MAX)), vec![3, 4]);

        let past = MarkerTrack::new(vec![EventMarker::new(1, "arrival", at(8, 0))]);
        let clock = PlaybackClock::new(at(9, 0));
        assert!(past.upcoming(&clock, usize::MAX).is_empty());
    }

    #[test]
    fn test_marker_json_shape() {
        let marker = EventMarker::new(1, "arrival", at(8, 0)).with_patient(7);
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["type"], "arrival");
        assert_eq!(json["timestamp"], "2026-01-15T08:00:00");
        assert_eq!(json["patient_id"], 7);
        assert!(json.get("bed_id").is_none());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_marker_data_payload() {
        let marker: EventMarker = serde_json::from_str(
            r#"{"id": 5, "type": "imaging_request", "timestamp": "2026-01-15T10:00:00",
                "patient_id": 9, "data": {"modality": "CT"}}"#,
        )
        .unwrap();
        assert_eq!(marker.data, Some(serde_json::json!({"modality": "CT"})));
        assert_eq!(marker.bed_id, None);

        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["data"]["modality"], "CT");
    }

    #[test]
    fn test_empty_track() {
        let track = MarkerTrack::default();
        assert!(track.is_empty());
        assert!(track.between(at(0, 0), at(23, 0)).is_empty());
    }
}
