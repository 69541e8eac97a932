use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::classify::Direction;

/// Marker written in place of speed and direction for non-primary detections.
pub const ASSOCIATED: &str = "Associated";

/// Column order of the traffic log.
pub const LOG_COLUMNS: [&str; 8] = [
    "timestamp_utc",
    "object_type",
    "confidence",
    "speed_kph",
    "cardinal_direction",
    "location_type",
    "obj_center_x",
    "obj_center_y",
];

/// A measured value for the primary target, or the associated marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation<T> {
    Primary(T),
    Associated,
}

impl<T> Annotation<T> {
    pub fn primary(&self) -> Option<&T> {
        match self {
            Annotation::Primary(value) => Some(value),
            Annotation::Associated => None,
        }
    }

    pub fn is_associated(&self) -> bool {
        matches!(self, Annotation::Associated)
    }
}

impl<T: Serialize> Serialize for Annotation<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Annotation::Primary(value) => value.serialize(serializer),
            Annotation::Associated => serializer.serialize_str(ASSOCIATED),
        }
    }
}

/// One row of the traffic log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    #[serde(rename = "timestamp_utc", serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub object_type: String,
    pub confidence: f32,
    #[serde(rename = "speed_kph")]
    pub speed: Annotation<f64>,
    #[serde(rename = "cardinal_direction")]
    pub direction: Annotation<Direction>,
    #[serde(rename = "location_type")]
    pub location: String,
    #[serde(rename = "obj_center_x")]
    pub x: f32,
    #[serde(rename = "obj_center_y")]
    pub y: f32,
}

impl LogEntry {
    pub fn timestamp_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    pub fn is_primary(&self) -> bool {
        !self.speed.is_associated()
    }
}

/// ISO-8601 UTC with microseconds and a trailing `Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Compass;
    use chrono::TimeZone;

    fn entry(speed: Annotation<f64>, direction: Annotation<Direction>) -> LogEntry {
        LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap(),
            object_type: "car".into(),
            confidence: 0.5,
            speed,
            direction,
            location: "road".into(),
            x: 100.0,
            y: 200.0,
        }
    }

    #[test]
    fn timestamp_has_trailing_z() {
        let row = entry(Annotation::Associated, Annotation::Associated);
        assert_eq!(row.timestamp_string(), "2024-05-01T12:30:05.000000Z");
    }

    #[test]
    fn primary_entry_serializes_values() {
        let row = entry(
            Annotation::Primary(9.0),
            Annotation::Primary(Direction::Heading(Compass::East)),
        );
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["speed_kph"], 9.0);
        assert_eq!(json["cardinal_direction"], "E");
        assert_eq!(json["timestamp_utc"], "2024-05-01T12:30:05.000000Z");
        assert!(row.is_primary());
    }

    #[test]
    fn associated_entry_serializes_markers() {
        let row = entry(Annotation::Associated, Annotation::Associated);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["speed_kph"], ASSOCIATED);
        assert_eq!(json["cardinal_direction"], ASSOCIATED);
        assert_eq!(json["location_type"], "road");
    }

    #[test]
    fn serialized_fields_follow_log_columns() {
        let row = entry(Annotation::Associated, Annotation::Associated);
        let json = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = LOG_COLUMNS.to_vec();
        expected.sort_unstable();
        let mut keys_sorted = keys.clone();
        keys_sorted.sort_unstable();
        assert_eq!(keys_sorted, expected);
    }
}
