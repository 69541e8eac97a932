use crate::prelude::{LogSink, SinkError};
use crate::record::LogEntry;

/// In-memory sink used by dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<LogEntry>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, entry: &LogEntry) -> Result<(), SinkError> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}
