//! Event-classification and capture-sequencing core for the radar-triggered
//! traffic logger.
//!
//! A radar speed reading is bucketed, one or two camera frames are captured
//! and run through the detector, and the resulting detections are filtered
//! by zone and per-class cooldown before being written to the traffic log.
//! Camera, detector, radar transport and log storage are supplied by the
//! caller through the traits in [`prelude`].

pub mod classify;
pub mod config;
pub mod engine;
pub mod prelude;
pub mod record;
pub mod telemetry;

pub use engine::{EventOutcome, Flow, TrafficEngine};
pub use prelude::{Camera, CaptureDetect, Detection, FrameGeometry, FrameSize, LogSink, Position, RadarReading};
