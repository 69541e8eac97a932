use chrono::{DateTime, Utc};
use log::warn;
use std::time::Instant;

use crate::classify::{CooldownRegistry, PrimaryTargetSelector, ZoneClassifier};
use crate::config::CooldownTable;
use crate::engine::orchestrator::CycleResult;
use crate::prelude::LogSink;
use crate::record::{Annotation, LogEntry};
use crate::telemetry::{LogManager, MetricsRecorder};

/// Moment a cycle is logged, on both clocks.
#[derive(Debug, Clone, Copy)]
pub struct LogStamp {
    pub monotonic: Instant,
    pub utc: DateTime<Utc>,
}

/// Filters a cycle's detections through the zone grid, annotates them and
/// appends them to the sink, refreshing cooldowns as it goes.
pub struct DetectionLogger {
    zones: ZoneClassifier,
    selector: PrimaryTargetSelector,
    cooldowns: CooldownTable,
    log: LogManager,
}

impl DetectionLogger {
    pub fn new(zones: ZoneClassifier, selector: PrimaryTargetSelector, cooldowns: CooldownTable) -> Self {
        Self {
            zones,
            selector,
            cooldowns,
            log: LogManager::new(),
        }
    }

    /// Returns the number of entries appended.
    pub fn log_cycle<S: LogSink>(
        &self,
        cycle: &CycleResult,
        speed_kph: f64,
        stamp: LogStamp,
        registry: &mut CooldownRegistry,
        sink: &mut S,
        metrics: &MetricsRecorder,
    ) -> usize {
        // primary is chosen before zone filtering, so it may itself be discarded
        let Some(primary) = self.selector.select(&cycle.detections, cycle.frame) else {
            return 0;
        };

        let mut written = 0;
        for (index, detection) in cycle.detections.iter().enumerate() {
            let zone = self.zones.classify(detection.center, cycle.frame);
            if zone.is_ignore() {
                self.log.discarded(&detection.object_type);
                metrics.record_ignored();
                continue;
            }

            let (speed, direction) = if index == primary {
                (Annotation::Primary(speed_kph), Annotation::Primary(cycle.direction))
            } else {
                (Annotation::Associated, Annotation::Associated)
            };

            let cooldown = self.cooldowns.duration_for(&detection.object_type);
            registry.extend(&detection.object_type, stamp.monotonic + cooldown);

            let entry = LogEntry {
                timestamp: stamp.utc,
                object_type: detection.object_type.clone(),
                confidence: detection.confidence,
                speed,
                direction,
                location: zone.name().to_string(),
                x: detection.center.x,
                y: detection.center.y,
            };

            match sink.append(&entry) {
                Ok(()) => {
                    self.log.logged(&entry);
                    metrics.record_entry();
                    written += 1;
                }
                Err(err) => {
                    warn!("Failed to append {} entry: {}", entry.object_type, err);
                    metrics.record_sink_error();
                }
            }
        }
        written
    }
}
