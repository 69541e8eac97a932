use serde::{Deserialize, Serialize};

use crate::record::LogEntry;

/// Pixel-space centre of a detection box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Single object reported by the external detector for one captured frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "type")]
    pub object_type: String,
    pub confidence: f32,
    #[serde(rename = "box_center")]
    pub center: Position,
}

impl Detection {
    pub fn new(object_type: impl Into<String>, confidence: f32, center: Position) -> Self {
        Self {
            object_type: object_type.into(),
            confidence,
            center,
        }
    }

    pub fn is_class(&self, class: &str) -> bool {
        self.object_type == class
    }
}

/// Speed report delivered by the radar transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarReading {
    pub speed_mps: f64,
}

impl RadarReading {
    pub fn new(speed_mps: f64) -> Self {
        Self { speed_mps }
    }

    /// Speed in km/h rounded to two decimals, the unit thresholds and log rows use.
    pub fn speed_kph(&self) -> f64 {
        (self.speed_mps * 3.6 * 100.0).round() / 100.0
    }
}

/// Pixel dimensions of the capture frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(1536, 864)
    }
}

/// Fatal deployment configuration problems, raised before the engine starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
    #[error("invalid zone map: {0}")]
    InvalidZoneMap(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure reported by a log sink while appending an entry.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("sink i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("entry rejected: {0}")]
    Rejected(String),
}

/// Captures a frame and runs inference on it.
///
/// Implementations absorb camera and detector failures and return an empty
/// list instead; the core reads an empty list as "nothing seen".
pub trait CaptureDetect {
    fn capture_and_detect(&mut self) -> Vec<Detection>;
}

/// Reports the current capture frame geometry.
pub trait FrameGeometry {
    fn frame_size(&self) -> FrameSize;
}

/// The camera + detector pair the engine drives.
pub trait Camera: CaptureDetect + FrameGeometry {}

impl<T: CaptureDetect + FrameGeometry> Camera for T {}

/// Append-only destination for log rows.
pub trait LogSink {
    fn append(&mut self, entry: &LogEntry) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_converted_and_rounded_to_kph() {
        assert_eq!(RadarReading::new(2.5).speed_kph(), 9.0);
        assert_eq!(RadarReading::new(1.234).speed_kph(), 4.44);
    }

    #[test]
    fn detection_deserializes_from_detector_layout() {
        let json = r#"{"type":"car","confidence":0.82,"box_center":{"x":120,"y":64}}"#;
        let detection: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(detection.object_type, "car");
        assert_eq!(detection.center, Position::new(120.0, 64.0));
    }

    #[test]
    fn frame_center_is_half_of_each_dimension() {
        assert_eq!(FrameSize::new(640, 480).center(), Position::new(320.0, 240.0));
    }
}
