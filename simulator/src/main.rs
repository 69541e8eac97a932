use anyhow::Context;
use bridge::CsvSink;
use clap::Parser;
use generator::GeneratorConfig;
use std::path::PathBuf;
use trafficcore::engine::{Clock, ManualClock, SystemClock};
use trafficcore::telemetry::MetricsSnapshot;
use trafficcore::FrameSize;
use workflow::{DeploymentFolder, Runner, ScenarioConfig};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Off-hardware driver for the radar-triggered traffic logger")]
struct Args {
    /// Deployment folder holding deployment_info.json and zone_map.json
    #[arg(long)]
    folder: PathBuf,
    /// Replay scripted radar events and detections from YAML
    #[arg(long, conflicts_with_all = ["generate", "live"])]
    scenario: Option<PathBuf>,
    /// Run this many synthetic radar events
    #[arg(long, conflicts_with = "live")]
    generate: Option<usize>,
    /// Read radar lines from stdin until EOF or Ctrl+C
    #[arg(long, default_value_t = false)]
    live: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// CSV log path; defaults to traffic_data.csv in the deployment folder
    #[arg(long)]
    output: Option<PathBuf>,
    /// Simulate the inter-shot wait instead of sleeping
    #[arg(long, default_value_t = false)]
    no_delay: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let folder = DeploymentFolder::load(&args.folder)?;
    log::info!("Configuration files loaded from {}.", folder.path.display());

    let output = args.output.clone().unwrap_or_else(|| folder.traffic_log_path());
    let sink = CsvSink::open(&output)
        .with_context(|| format!("opening traffic log {}", output.display()))?;
    log::info!("CSV writer ready at {}.", sink.path().display());

    let runner = Runner::new(folder.settings.clone(), folder.zone_map.clone());
    let metrics = if args.no_delay {
        run(&runner, &args, sink, ManualClock::new())?
    } else {
        run(&runner, &args, sink, SystemClock)?
    };

    println!(
        "events={} suppressed={} captures={} entries={} ignored={} sink_errors={}",
        metrics.events,
        metrics.suppressed,
        metrics.captures,
        metrics.entries,
        metrics.ignored,
        metrics.sink_errors
    );
    println!("log -> {}", output.display());
    Ok(())
}

fn run<C: Clock>(
    runner: &Runner,
    args: &Args,
    sink: CsvSink,
    clock: C,
) -> anyhow::Result<MetricsSnapshot> {
    let generator = GeneratorConfig {
        seed: args.seed,
        events: args.generate.unwrap_or_default(),
        frame: FrameSize::default(),
        ..Default::default()
    };

    if let Some(path) = &args.scenario {
        let scenario = ScenarioConfig::load(path)?;
        let (summary, _) = runner.replay(&scenario, sink, clock)?;
        println!(
            "Replay -> {} events, {} with log entries",
            summary.outcomes.len(),
            summary.logged_events()
        );
        Ok(summary.metrics)
    } else if args.generate.is_some() {
        let (summary, _) = runner.generate(&generator, sink, clock)?;
        println!(
            "Synthetic run -> {} events, {} with log entries",
            summary.outcomes.len(),
            summary.logged_events()
        );
        Ok(summary.metrics)
    } else if args.live {
        let (metrics, _) = runner.live(&generator, sink, clock)?;
        Ok(metrics)
    } else {
        anyhow::bail!("nothing to do: pass --scenario, --generate or --live")
    }
}
