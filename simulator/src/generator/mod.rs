pub mod profile;
pub mod scripted;

pub use profile::{build_readings, GeneratorConfig, SyntheticDetector};
pub use scripted::ScriptedDetector;
