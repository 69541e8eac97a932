pub mod settings;
pub mod zone_map;

pub use settings::{CooldownTable, DeploymentSettings, DetectionSettings};
pub use zone_map::{default_zone_names, RawZoneMap, ZoneMap};
