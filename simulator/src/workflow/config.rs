use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trafficcore::config::{DeploymentSettings, ZoneMap};
use trafficcore::{Detection, FrameSize};

pub const DEPLOYMENT_INFO_FILE: &str = "deployment_info.json";
pub const ZONE_MAP_FILE: &str = "zone_map.json";
pub const TRAFFIC_LOG_FILE: &str = "traffic_data.csv";

/// A deployment folder as written by the configuration UI.
#[derive(Debug, Clone)]
pub struct DeploymentFolder {
    pub path: PathBuf,
    pub settings: DeploymentSettings,
    pub zone_map: ZoneMap,
}

impl DeploymentFolder {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        anyhow::ensure!(path.is_dir(), "deployment folder {} not found", path.display());

        let info_path = path.join(DEPLOYMENT_INFO_FILE);
        let contents = fs::read_to_string(&info_path)
            .with_context(|| format!("reading deployment settings {}", info_path.display()))?;
        let settings = DeploymentSettings::from_json_str(&contents)
            .with_context(|| format!("parsing deployment settings {}", info_path.display()))?;

        let zone_path = path.join(ZONE_MAP_FILE);
        let contents = fs::read_to_string(&zone_path)
            .with_context(|| format!("reading zone map {}", zone_path.display()))?;
        let zone_map = ZoneMap::from_json_str(&contents)
            .with_context(|| format!("parsing zone map {}", zone_path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            settings,
            zone_map,
        })
    }

    pub fn traffic_log_path(&self) -> PathBuf {
        self.path.join(TRAFFIC_LOG_FILE)
    }
}

/// Scripted radar events with the detector output each capture returns.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub frame: FrameSize,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub speed_mps: f64,
    /// One detection list per capture, consumed in order.
    #[serde(default)]
    pub captures: Vec<Vec<Detection>>,
    /// Simulated seconds elapsed before this event.
    #[serde(default)]
    pub delay_sec: f64,
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_deployment(dir: &Path) {
        fs::write(
            dir.join(DEPLOYMENT_INFO_FILE),
            r#"{
                "start_utc": "2024-05-01T08:00:00Z",
                "bearing": "90",
                "notes": "north corner",
                "detection_settings": {
                    "vehicle_speed_kph": 8.0,
                    "low_speed_kph": 1.0,
                    "shot_interval_sec": 0.25,
                    "cooldown_sec": {"default": 5.0, "person": 5.0, "bicycle": 8.0}
                }
            }"#,
        )
        .unwrap();
        let row: Vec<&str> = (0..32).map(|col| if col < 4 { "0" } else { "1" }).collect();
        let grid = vec![format!("[{}]", row.join(",")); 18].join(",");
        fs::write(
            dir.join(ZONE_MAP_FILE),
            format!(
                r#"{{"dims": [32, 18], "zones": {{"0": "ignore", "1": "road", "2": "sidewalk", "3": "bike_lane"}}, "map": [{}]}}"#,
                grid
            ),
        )
        .unwrap();
    }

    #[test]
    fn deployment_folder_loads_both_files() {
        let dir = tempdir().unwrap();
        write_deployment(dir.path());

        let folder = DeploymentFolder::load(dir.path()).unwrap();
        assert_eq!(folder.settings.bearing, 90);
        assert_eq!(folder.settings.low_speed_kph(), 1.0);
        assert_eq!(folder.zone_map.cols(), 32);
        assert_eq!(folder.traffic_log_path(), dir.path().join(TRAFFIC_LOG_FILE));
    }

    #[test]
    fn missing_zone_map_fails_to_load() {
        let dir = tempdir().unwrap();
        write_deployment(dir.path());
        fs::remove_file(dir.path().join(ZONE_MAP_FILE)).unwrap();

        let err = DeploymentFolder::load(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("zone map"));
    }

    #[test]
    fn scenario_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"frame: {width: 640, height: 480}\nevents:\n  - speed_mps: 3.0\n    captures:\n      - [{type: car, confidence: 0.9, box_center: {x: 10, y: 20}}]\n      - []\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let scenario = ScenarioConfig::load(&path).unwrap();
        assert_eq!(scenario.frame, FrameSize::new(640, 480));
        assert_eq!(scenario.events[0].captures.len(), 2);
        assert_eq!(scenario.events[0].captures[0][0].object_type, "car");
    }
}
