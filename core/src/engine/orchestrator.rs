use log::{debug, info};
use std::time::Duration;

use crate::classify::{CooldownRegistry, Direction, DirectionEstimator, PrimaryTargetSelector};
use crate::engine::clock::Clock;
use crate::prelude::{Camera, Detection, FrameSize};
use crate::telemetry::MetricsRecorder;

/// Class that earns a follow-up capture in the conditional-shot flow.
pub const DIRECTION_CLASS: &str = "bicycle";

/// Detections chosen for logging plus the direction of their primary target.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub detections: Vec<Detection>,
    pub direction: Direction,
    pub frame: FrameSize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Ready(CycleResult),
    /// First capture returned no detections.
    NothingSeen,
    /// Every detection belonged to a class on cooldown.
    AllOnCooldown,
}

/// Sequences capture+detect cycles for the two radar-triggered flows.
#[derive(Debug, Clone)]
pub struct CaptureOrchestrator {
    shot_interval: Duration,
    estimator: DirectionEstimator,
    selector: PrimaryTargetSelector,
}

impl CaptureOrchestrator {
    pub fn new(
        shot_interval: Duration,
        estimator: DirectionEstimator,
        selector: PrimaryTargetSelector,
    ) -> Self {
        Self {
            shot_interval,
            estimator,
            selector,
        }
    }

    fn capture<D: Camera>(&self, camera: &mut D, metrics: &MetricsRecorder) -> Vec<Detection> {
        metrics.record_capture();
        let detections = camera.capture_and_detect();
        info!("AI analysis complete. Found {} detections.", detections.len());
        detections
    }

    /// Direction between the primary targets of two cycles, if they share a class.
    fn track(&self, first: &[Detection], second: &[Detection], frame: FrameSize) -> Direction {
        let start = self.selector.select_detection(first, frame);
        let end = self.selector.select_detection(second, frame);
        match (start, end) {
            (Some(start), Some(end)) if start.object_type == end.object_type => {
                self.estimator.estimate(start.center, end.center)
            }
            (Some(start), Some(end)) => {
                debug!(
                    "Primary target changed from {} to {}; direction unavailable.",
                    start.object_type, end.object_type
                );
                Direction::Unavailable
            }
            _ => Direction::Unavailable,
        }
    }

    /// Capture, wait, capture again. Only the second list is logged.
    pub fn two_shot<D: Camera, C: Clock>(
        &self,
        camera: &mut D,
        clock: &C,
        metrics: &MetricsRecorder,
    ) -> CaptureOutcome {
        let first = self.capture(camera, metrics);
        clock.sleep(self.shot_interval);
        let second = self.capture(camera, metrics);

        let frame = camera.frame_size();
        let direction = self.track(&first, &second, frame);

        CaptureOutcome::Ready(CycleResult {
            detections: second,
            direction,
            frame,
        })
    }

    /// Capture once, drop classes on cooldown, and take a second shot only
    /// when a bicycle needs a direction.
    pub fn conditional_shot<D: Camera, C: Clock>(
        &self,
        camera: &mut D,
        clock: &C,
        cooldowns: &CooldownRegistry,
        metrics: &MetricsRecorder,
    ) -> CaptureOutcome {
        let first = self.capture(camera, metrics);
        if first.is_empty() {
            return CaptureOutcome::NothingSeen;
        }

        let now = clock.monotonic();
        let valid: Vec<Detection> = first
            .into_iter()
            .filter(|d| cooldowns.is_available(&d.object_type, now))
            .collect();
        if valid.is_empty() {
            debug!("Detections found but all classes are on cooldown. Ignoring.");
            return CaptureOutcome::AllOnCooldown;
        }

        let frame = camera.frame_size();
        if !valid.iter().any(|d| d.is_class(DIRECTION_CLASS)) {
            return CaptureOutcome::Ready(CycleResult {
                detections: valid,
                direction: Direction::Unavailable,
                frame,
            });
        }

        info!("Bicycle detected, getting second shot for direction.");
        clock.sleep(self.shot_interval);
        let second = self.capture(camera, metrics);
        let frame = camera.frame_size();
        if second.is_empty() {
            // follow-up saw nothing: keep the first list without a direction
            return CaptureOutcome::Ready(CycleResult {
                detections: valid,
                direction: Direction::Unavailable,
                frame,
            });
        }

        let bikes_before = only_class(&valid, DIRECTION_CLASS);
        let bikes_after = only_class(&second, DIRECTION_CLASS);
        let direction = self.track(&bikes_before, &bikes_after, frame);

        CaptureOutcome::Ready(CycleResult {
            detections: second,
            direction,
            frame,
        })
    }
}

fn only_class(detections: &[Detection], class: &str) -> Vec<Detection> {
    detections
        .iter()
        .filter(|d| d.is_class(class))
        .cloned()
        .collect()
}
