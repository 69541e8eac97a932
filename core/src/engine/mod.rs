//! Radar-triggered capture pipeline: classify the reading, run the capture
//! flow it calls for, then log what was seen.

pub mod classifier;
pub mod clock;
pub mod logger;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{EventClass, EventDecision, RadarEventClassifier, SLOW_CLASSES};
pub use clock::{Clock, ManualClock, SystemClock};
pub use logger::{DetectionLogger, LogStamp};
pub use orchestrator::{CaptureOrchestrator, CaptureOutcome, CycleResult, DIRECTION_CLASS};

use log::{debug, info, warn};

use crate::classify::{CooldownRegistry, Direction, DirectionEstimator, PrimaryTargetSelector, ZoneClassifier};
use crate::config::{DeploymentSettings, ZoneMap};
use crate::prelude::{Camera, ConfigResult, LogSink, RadarReading};
use crate::telemetry::{MetricsRecorder, MetricsSnapshot};

/// Which capture flow a reading ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    TwoShot,
    ConditionalShot,
}

/// What processing a single radar reading amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Below the low-speed threshold.
    Ignored,
    /// Low speed, but every slow class is on cooldown.
    Suppressed,
    NothingSeen,
    AllOnCooldown,
    Logged {
        flow: Flow,
        entries: usize,
        direction: Direction,
    },
}

/// Owns the cooldown state and external collaborators for one deployment.
pub struct TrafficEngine<D, S, C = SystemClock> {
    classifier: RadarEventClassifier,
    orchestrator: CaptureOrchestrator,
    logger: DetectionLogger,
    cooldowns: CooldownRegistry,
    metrics: MetricsRecorder,
    camera: D,
    sink: S,
    clock: C,
}

impl<D: Camera, S: LogSink, C: Clock> TrafficEngine<D, S, C> {
    /// Fails when the settings do not validate; nothing is captured in that case.
    pub fn new(
        settings: &DeploymentSettings,
        zone_map: ZoneMap,
        camera: D,
        sink: S,
        clock: C,
    ) -> ConfigResult<Self> {
        settings.validate()?;

        let selector = PrimaryTargetSelector::new(settings.vehicle_classes().clone());
        let estimator = DirectionEstimator::new(settings.bearing);
        info!(
            "Engine ready: high {} kph, low {} kph, shot interval {:?}, bearing {}",
            settings.high_speed_kph(),
            settings.low_speed_kph(),
            settings.shot_interval(),
            settings.bearing
        );

        Ok(Self {
            classifier: RadarEventClassifier::new(settings.high_speed_kph(), settings.low_speed_kph()),
            orchestrator: CaptureOrchestrator::new(settings.shot_interval(), estimator, selector.clone()),
            logger: DetectionLogger::new(
                ZoneClassifier::new(zone_map),
                selector,
                settings.cooldowns().clone(),
            ),
            cooldowns: CooldownRegistry::new(),
            metrics: MetricsRecorder::new(),
            camera,
            sink,
            clock,
        })
    }

    /// Runs classify -> capture -> log for one reading and returns once done.
    pub fn process_reading(&mut self, reading: RadarReading) -> EventOutcome {
        self.metrics.record_event();
        let speed_kph = reading.speed_kph();
        debug!("Radar trigger: {} kph", speed_kph);

        let now = self.clock.monotonic();
        let (flow, outcome) = match self.classifier.decide(speed_kph, &self.cooldowns, now) {
            EventDecision::NoAction => return EventOutcome::Ignored,
            EventDecision::Suppressed => {
                debug!("Low-speed event ignored: all relevant classes on cooldown.");
                self.metrics.record_suppressed();
                return EventOutcome::Suppressed;
            }
            EventDecision::TwoShot => {
                info!("High-speed event ({} kph). Two-Shot.", speed_kph);
                let outcome = self
                    .orchestrator
                    .two_shot(&mut self.camera, &self.clock, &self.metrics);
                (Flow::TwoShot, outcome)
            }
            EventDecision::ConditionalShot => {
                info!("Low-speed event ({} kph). Conditional-Shot.", speed_kph);
                let outcome = self.orchestrator.conditional_shot(
                    &mut self.camera,
                    &self.clock,
                    &self.cooldowns,
                    &self.metrics,
                );
                (Flow::ConditionalShot, outcome)
            }
        };

        let cycle = match outcome {
            CaptureOutcome::Ready(cycle) => cycle,
            CaptureOutcome::NothingSeen => return EventOutcome::NothingSeen,
            CaptureOutcome::AllOnCooldown => return EventOutcome::AllOnCooldown,
        };

        let stamp = LogStamp {
            monotonic: self.clock.monotonic(),
            utc: self.clock.now_utc(),
        };
        let entries = self.logger.log_cycle(
            &cycle,
            speed_kph,
            stamp,
            &mut self.cooldowns,
            &mut self.sink,
            &self.metrics,
        );
        if let Err(err) = self.sink.flush() {
            warn!("Failed to flush log sink: {}", err);
            self.metrics.record_sink_error();
        }

        EventOutcome::Logged {
            flow,
            entries,
            direction: cycle.direction,
        }
    }

    pub fn cooldowns(&self) -> &CooldownRegistry {
        &self.cooldowns
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn camera(&self) -> &D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut D {
        &mut self.camera
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_parts(self) -> (D, S, C) {
        (self.camera, self.sink, self.clock)
    }
}
