use anyhow::{bail, Context};
use log::{debug, info, warn};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use trafficcore::engine::Clock;
use trafficcore::{Camera, LogSink, RadarReading, TrafficEngine};

/// Parses one line of radar serial output.
///
/// The sensor emits either a JSON object carrying `speed` or a `"mps",<value>`
/// pair. Other lines (status, blank) yield `None`.
pub fn parse_radar_line(line: &str) -> anyhow::Result<Option<RadarReading>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if line.starts_with('{') && line.ends_with('}') {
        let value: serde_json::Value = serde_json::from_str(line).context("decoding radar JSON")?;
        return match value.get("speed") {
            None => Ok(None),
            Some(serde_json::Value::Number(number)) => number
                .as_f64()
                .map(|speed| Some(RadarReading::new(speed)))
                .context("speed is not representable as f64"),
            Some(serde_json::Value::String(text)) => {
                let speed = text
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("speed `{}` is not a number", text))?;
                Ok(Some(RadarReading::new(speed)))
            }
            Some(other) => bail!("unexpected speed value {}", other),
        };
    }

    if line.contains("\"mps\"") {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() == 2 {
            let speed = parts[1]
                .trim()
                .parse::<f64>()
                .with_context(|| format!("speed `{}` is not a number", parts[1]))?;
            return Ok(Some(RadarReading::new(speed)));
        }
    }

    Ok(None)
}

/// Feeds radar lines into the engine until the reader ends or `shutdown` fires.
///
/// `on_reading` sees the camera before each reading is processed. Readings are
/// processed one at a time; a line arriving mid-capture waits in the reader.
pub async fn ingest_lines<R, D, S, C, F, H>(
    reader: R,
    engine: &mut TrafficEngine<D, S, C>,
    mut on_reading: H,
    shutdown: F,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    D: Camera,
    S: LogSink,
    C: Clock,
    F: Future,
    H: FnMut(&mut D, RadarReading),
{
    let mut lines = reader.lines();
    let mut processed = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading radar line")? else {
                    debug!("Radar input closed.");
                    break;
                };
                debug!("Raw radar line: {}", line);
                match parse_radar_line(&line) {
                    Ok(Some(reading)) => {
                        on_reading(engine.camera_mut(), reading);
                        engine.process_reading(reading);
                        processed += 1;
                    }
                    Ok(None) => {}
                    Err(err) => warn!("Could not process radar line: '{}'. Error: {:#}", line.trim(), err),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping radar ingest.");
                break;
            }
        }
    }

    Ok(processed)
}
