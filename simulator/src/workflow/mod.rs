pub mod config;
pub mod runner;

pub use config::{DeploymentFolder, ScenarioConfig};
pub use runner::Runner;
