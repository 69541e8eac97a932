use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use trafficcore::prelude::{LogSink, SinkError};
use trafficcore::record::{LogEntry, LOG_COLUMNS};

/// Appends log entries to the deployment's `traffic_data.csv`.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Opens `path` for appending; the header row is written only to an empty file.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_empty {
            writer.write_record(LOG_COLUMNS)?;
            writer.flush()?;
        }
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for CsvSink {
    fn append(&mut self, entry: &LogEntry) -> Result<(), SinkError> {
        self.writer
            .serialize(entry)
            .map_err(|err| SinkError::Rejected(err.to_string()))
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
