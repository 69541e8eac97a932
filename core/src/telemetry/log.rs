use log::{debug, info};

use crate::record::LogEntry;

/// Operator-facing log lines for what the detection logger did with each detection.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn logged(&self, entry: &LogEntry) {
        info!(
            "LOGGED: {} at speed {}, dir {} in {}",
            entry.object_type,
            speed_label(entry),
            direction_label(entry),
            entry.location
        );
    }

    pub fn discarded(&self, object_type: &str) {
        debug!("Discarding {} in IGNORE zone.", object_type);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

fn speed_label(entry: &LogEntry) -> String {
    match entry.speed.primary() {
        Some(speed) => format!("{:.2}", speed),
        None => crate::record::ASSOCIATED.to_string(),
    }
}

fn direction_label(entry: &LogEntry) -> String {
    match entry.direction.primary() {
        Some(direction) => direction.to_string(),
        None => crate::record::ASSOCIATED.to_string(),
    }
}
