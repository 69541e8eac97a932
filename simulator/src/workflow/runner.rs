use anyhow::Context;
use log::info;
use std::time::Duration;
use trafficcore::config::{DeploymentSettings, ZoneMap};
use trafficcore::engine::Clock;
use trafficcore::telemetry::MetricsSnapshot;
use trafficcore::{Camera, EventOutcome, LogSink, RadarReading, TrafficEngine};

use crate::bridge::ingest_lines;
use crate::generator::{build_readings, GeneratorConfig, ScriptedDetector, SyntheticDetector};
use crate::workflow::config::ScenarioConfig;

pub struct RunSummary {
    pub outcomes: Vec<EventOutcome>,
    pub metrics: MetricsSnapshot,
}

impl RunSummary {
    pub fn logged_events(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, EventOutcome::Logged { entries, .. } if *entries > 0))
            .count()
    }
}

/// Builds engines for one deployment and drives them from a radar source.
#[derive(Clone)]
pub struct Runner {
    settings: DeploymentSettings,
    zone_map: ZoneMap,
}

impl Runner {
    pub fn new(settings: DeploymentSettings, zone_map: ZoneMap) -> Self {
        Self { settings, zone_map }
    }

    /// Generator settings with the deployment's vehicle threshold applied.
    fn detector_config(&self, config: &GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            vehicle_speed_kph: self.settings.high_speed_kph(),
            ..config.clone()
        }
    }

    fn engine<D: Camera, S: LogSink, C: Clock>(
        &self,
        camera: D,
        sink: S,
        clock: C,
    ) -> anyhow::Result<TrafficEngine<D, S, C>> {
        TrafficEngine::new(&self.settings, self.zone_map.clone(), camera, sink, clock)
            .context("starting traffic engine")
    }

    /// Plays back the scripted events of a scenario.
    pub fn replay<S: LogSink, C: Clock>(
        &self,
        scenario: &ScenarioConfig,
        sink: S,
        clock: C,
    ) -> anyhow::Result<(RunSummary, S)> {
        let mut engine = self.engine(ScriptedDetector::new(scenario.frame), sink, clock)?;
        let mut outcomes = Vec::with_capacity(scenario.events.len());

        for event in &scenario.events {
            if event.delay_sec > 0.0 {
                engine.clock().sleep(seconds(event.delay_sec));
            }
            engine.camera_mut().load(event.captures.clone());
            outcomes.push(engine.process_reading(RadarReading::new(event.speed_mps)));
        }

        info!(
            "Replayed {} events using {} captures.",
            outcomes.len(),
            engine.camera().captures()
        );
        Ok(finish(engine, outcomes))
    }

    /// Runs seeded synthetic radar events through the synthetic detector.
    pub fn generate<S: LogSink, C: Clock>(
        &self,
        config: &GeneratorConfig,
        sink: S,
        clock: C,
    ) -> anyhow::Result<(RunSummary, S)> {
        let detector = SyntheticDetector::new(self.detector_config(config));
        let mut engine = self.engine(detector, sink, clock)?;
        let mut outcomes = Vec::with_capacity(config.events);

        for (index, reading) in build_readings(config).into_iter().enumerate() {
            if index > 0 {
                engine.clock().sleep(seconds(config.event_gap_sec));
            }
            engine.camera_mut().begin_event(reading);
            outcomes.push(engine.process_reading(reading));
        }

        Ok(finish(engine, outcomes))
    }

    /// Reads radar lines from stdin until EOF or Ctrl+C.
    pub fn live<S: LogSink, C: Clock>(
        &self,
        config: &GeneratorConfig,
        sink: S,
        clock: C,
    ) -> anyhow::Result<(MetricsSnapshot, S)> {
        let detector = SyntheticDetector::new(self.detector_config(config));
        let mut engine = self.engine(detector, sink, clock)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for radar ingest")?;

        let processed = runtime.block_on(async {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            ingest_lines(
                stdin,
                &mut engine,
                |camera: &mut SyntheticDetector, reading| camera.begin_event(reading),
                tokio::signal::ctrl_c(),
            )
            .await
        })?;
        info!("Processed {} radar readings.", processed);

        let metrics = engine.metrics();
        let (_, sink, _) = engine.into_parts();
        Ok((metrics, sink))
    }
}

fn finish<D: Camera, S: LogSink, C: Clock>(
    engine: TrafficEngine<D, S, C>,
    outcomes: Vec<EventOutcome>,
) -> (RunSummary, S) {
    let metrics = engine.metrics();
    let (_, sink, _) = engine.into_parts();
    (RunSummary { outcomes, metrics }, sink)
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}
