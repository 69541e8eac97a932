pub mod entry;
pub mod sink;

pub use entry::{format_timestamp, Annotation, LogEntry, ASSOCIATED, LOG_COLUMNS};
pub use sink::MemorySink;
