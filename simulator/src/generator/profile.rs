use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use trafficcore::{CaptureDetect, Detection, FrameGeometry, FrameSize, Position, RadarReading};

const SLOW_LABELS: [&str; 3] = ["person", "bicycle", "dog"];
const FAST_LABELS: [&str; 4] = ["car", "truck", "bus", "motorcycle"];

/// Configuration for generating synthetic radar events and detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub events: usize,
    pub seed: u64,
    pub min_speed_mps: f64,
    pub max_speed_mps: f64,
    /// Probability that a capture returns nothing, as a failed capture would.
    pub miss_rate: f64,
    /// Upper bound on bystanders added to each capture.
    pub max_extras: usize,
    /// Seconds between consecutive radar events.
    pub event_gap_sec: f64,
    /// Readings at or above this speed bring a vehicle into view.
    pub vehicle_speed_kph: f64,
    pub frame: FrameSize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            events: 20,
            seed: 0,
            min_speed_mps: 0.0,
            max_speed_mps: 15.0,
            miss_rate: 0.1,
            max_extras: 2,
            event_gap_sec: 1.0,
            vehicle_speed_kph: 8.0,
            frame: FrameSize::default(),
        }
    }
}

impl GeneratorConfig {
    fn speed_range(&self) -> (f64, f64) {
        let low = self.min_speed_mps.max(0.0);
        (low, self.max_speed_mps.max(low))
    }
}

/// Seeded radar readings spread over the configured speed range.
pub fn build_readings(config: &GeneratorConfig) -> Vec<RadarReading> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (low, high) = config.speed_range();
    (0..config.events)
        .map(|_| {
            let speed = if high > low { rng.gen_range(low..high) } else { low };
            RadarReading::new(speed)
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Track {
    label: &'static str,
    position: Position,
    step: Position,
}

/// Stand-in detector that follows one moving object per radar event.
pub struct SyntheticDetector {
    rng: StdRng,
    config: GeneratorConfig,
    track: Option<Track>,
}

impl SyntheticDetector {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            config,
            track: None,
        }
    }

    /// Starts a new subject; fast readings get a vehicle, slow ones a pedestrian-class object.
    pub fn begin_event(&mut self, reading: RadarReading) {
        let frame = self.config.frame;
        let labels: &[&'static str] = if reading.speed_kph() >= self.config.vehicle_speed_kph {
            &FAST_LABELS
        } else {
            &SLOW_LABELS
        };
        let label = labels[self.rng.gen_range(0..labels.len())];
        let position = self.random_position(frame);
        let pixels_per_shot = (reading.speed_mps.abs() as f32 * 12.0).max(1.0);
        let step = if self.rng.gen_bool(0.5) {
            Position::new(pixels_per_shot, self.rng.gen_range(-3.0..3.0))
        } else {
            Position::new(-pixels_per_shot, self.rng.gen_range(-3.0..3.0))
        };
        self.track = Some(Track {
            label,
            position,
            step,
        });
    }

    fn random_position(&mut self, frame: FrameSize) -> Position {
        let width = frame.width.max(1) as f32;
        let height = frame.height.max(1) as f32;
        Position::new(self.rng.gen_range(0.0..width), self.rng.gen_range(0.0..height))
    }

    fn confidence(&mut self) -> f32 {
        let value: f32 = self.rng.gen_range(0.45..1.0);
        (value * 100.0).round() / 100.0
    }
}

impl CaptureDetect for SyntheticDetector {
    fn capture_and_detect(&mut self) -> Vec<Detection> {
        if self.rng.gen_bool(self.config.miss_rate.clamp(0.0, 1.0)) {
            warn!("Synthetic capture dropped.");
            return Vec::new();
        }

        let mut detections = Vec::new();
        if let Some(track) = self.track.as_mut() {
            let center = Position::new(track.position.x.round(), track.position.y.round());
            track.position.x += track.step.x;
            track.position.y += track.step.y;
            let label = track.label;
            let confidence = self.confidence();
            detections.push(Detection::new(label, confidence, center));
        }

        let extras = self.rng.gen_range(0..=self.config.max_extras);
        for _ in 0..extras {
            let label = SLOW_LABELS[self.rng.gen_range(0..SLOW_LABELS.len())];
            let confidence = self.confidence();
            let center = self.random_position(self.config.frame);
            detections.push(Detection::new(label, confidence, center));
        }
        detections
    }
}

impl FrameGeometry for SyntheticDetector {
    fn frame_size(&self) -> FrameSize {
        self.config.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_are_reproducible_and_in_range() {
        let config = GeneratorConfig {
            events: 50,
            seed: 7,
            min_speed_mps: 1.0,
            max_speed_mps: 4.0,
            ..Default::default()
        };
        let first = build_readings(&config);
        assert_eq!(first, build_readings(&config));
        assert_eq!(first.len(), 50);
        assert!(first.iter().all(|r| (1.0..4.0).contains(&r.speed_mps)));
    }

    #[test]
    fn degenerate_speed_range_repeats_minimum() {
        let config = GeneratorConfig {
            events: 3,
            min_speed_mps: 2.0,
            max_speed_mps: 1.0,
            ..Default::default()
        };
        assert!(build_readings(&config).iter().all(|r| r.speed_mps == 2.0));
    }

    #[test]
    fn tracked_subject_moves_between_captures() {
        let mut detector = SyntheticDetector::new(GeneratorConfig {
            seed: 3,
            miss_rate: 0.0,
            max_extras: 0,
            ..Default::default()
        });
        detector.begin_event(RadarReading::new(10.0));

        let first = detector.capture_and_detect();
        let second = detector.capture_and_detect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].object_type, second[0].object_type);
        assert!(FAST_LABELS.contains(&first[0].object_type.as_str()));
        assert!((second[0].center.x - first[0].center.x).abs() >= 100.0);
        assert!((0.45..=1.0).contains(&first[0].confidence));
    }

    #[test]
    fn vehicle_threshold_follows_config() {
        let mut detector = SyntheticDetector::new(GeneratorConfig {
            miss_rate: 0.0,
            max_extras: 0,
            vehicle_speed_kph: 40.0,
            ..Default::default()
        });
        // 10 m/s is 36 km/h, below the raised threshold
        detector.begin_event(RadarReading::new(10.0));
        let detections = detector.capture_and_detect();
        assert!(SLOW_LABELS.contains(&detections[0].object_type.as_str()));

        detector.begin_event(RadarReading::new(12.0));
        let detections = detector.capture_and_detect();
        assert!(FAST_LABELS.contains(&detections[0].object_type.as_str()));
    }

    #[test]
    fn certain_miss_rate_returns_empty_captures() {
        let mut detector = SyntheticDetector::new(GeneratorConfig {
            miss_rate: 1.0,
            ..Default::default()
        });
        detector.begin_event(RadarReading::new(1.0));
        assert!(detector.capture_and_detect().is_empty());
    }
}
