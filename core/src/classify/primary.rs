use std::collections::BTreeSet;

use crate::prelude::{Detection, FrameSize};

/// Picks the detection that speed and direction are attributed to.
///
/// The first vehicle-class detection wins; without one, the detection closest
/// to the frame centre is chosen (earliest on ties).
#[derive(Debug, Clone, Default)]
pub struct PrimaryTargetSelector {
    vehicle_classes: BTreeSet<String>,
}

impl PrimaryTargetSelector {
    pub fn new(vehicle_classes: BTreeSet<String>) -> Self {
        Self { vehicle_classes }
    }

    pub fn is_vehicle(&self, detection: &Detection) -> bool {
        self.vehicle_classes.contains(&detection.object_type)
    }

    /// Index of the primary detection, `None` for an empty list.
    pub fn select(&self, detections: &[Detection], frame: FrameSize) -> Option<usize> {
        if let Some(index) = detections.iter().position(|d| self.is_vehicle(d)) {
            return Some(index);
        }

        let center = frame.center();
        detections
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.center
                    .distance_to(center)
                    .total_cmp(&b.center.distance_to(center))
            })
            .map(|(index, _)| index)
    }

    pub fn select_detection<'a>(
        &self,
        detections: &'a [Detection],
        frame: FrameSize,
    ) -> Option<&'a Detection> {
        self.select(detections, frame).map(|index| &detections[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Position;

    fn selector() -> PrimaryTargetSelector {
        PrimaryTargetSelector::new(
            ["car", "motorcycle", "bus", "truck"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    fn detection(class: &str, confidence: f32, x: f32, y: f32) -> Detection {
        Detection::new(class, confidence, Position::new(x, y))
    }

    #[test]
    fn vehicle_class_beats_proximity() {
        let detections = vec![
            detection("dog", 0.9, 10.0, 10.0),
            detection("car", 0.5, 500.0, 500.0),
        ];
        let primary = selector().select_detection(&detections, FrameSize::new(640, 480));
        assert_eq!(primary.map(|d| d.object_type.as_str()), Some("car"));
    }

    #[test]
    fn first_vehicle_wins_over_later_vehicles() {
        let detections = vec![
            detection("person", 0.9, 320.0, 240.0),
            detection("truck", 0.6, 0.0, 0.0),
            detection("car", 0.99, 320.0, 240.0),
        ];
        assert_eq!(selector().select(&detections, FrameSize::new(640, 480)), Some(1));
    }

    #[test]
    fn nearest_to_center_without_vehicles() {
        let detections = vec![
            detection("person", 0.9, 10.0, 10.0),
            detection("dog", 0.4, 300.0, 250.0),
            detection("bicycle", 0.8, 600.0, 400.0),
        ];
        assert_eq!(selector().select(&detections, FrameSize::new(640, 480)), Some(1));
    }

    #[test]
    fn ties_keep_the_earliest_detection() {
        let detections = vec![
            detection("person", 0.9, 310.0, 240.0),
            detection("person", 0.9, 330.0, 240.0),
        ];
        assert_eq!(selector().select(&detections, FrameSize::new(640, 480)), Some(0));
    }

    #[test]
    fn empty_list_has_no_primary() {
        assert_eq!(selector().select(&[], FrameSize::new(640, 480)), None);
    }
}
