pub mod csv_sink;
pub mod radar;

pub use csv_sink::CsvSink;
pub use radar::ingest_lines;
