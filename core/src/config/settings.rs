use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::classify::direction::is_known_bearing;
use crate::prelude::{ConfigError, ConfigResult};

/// Contents of `deployment_info.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentSettings {
    #[serde(default, deserialize_with = "deserialize_bearing")]
    pub bearing: i32,
    #[serde(default)]
    pub detection_settings: DetectionSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_utc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub deep_sleep: bool,
}

/// Decision thresholds and cooldowns. Every field falls back to [`Default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub vehicle_classes: BTreeSet<String>,
    pub vehicle_speed_kph: f64,
    pub low_speed_kph: f64,
    pub shot_interval_sec: f64,
    pub cooldown_sec: CooldownTable,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            vehicle_classes: ["car", "motorcycle", "bus", "truck"]
                .into_iter()
                .map(String::from)
                .collect(),
            vehicle_speed_kph: 8.0,
            low_speed_kph: 2.0,
            shot_interval_sec: 0.25,
            cooldown_sec: CooldownTable::default(),
        }
    }
}

/// Per-class cooldown durations in seconds with a `default` fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooldownTable {
    #[serde(default = "default_cooldown_sec")]
    pub default: f64,
    #[serde(flatten)]
    pub per_class: BTreeMap<String, f64>,
}

fn default_cooldown_sec() -> f64 {
    5.0
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self {
            default: default_cooldown_sec(),
            per_class: BTreeMap::from([("person".to_string(), 5.0), ("bicycle".to_string(), 8.0)]),
        }
    }
}

impl CooldownTable {
    pub fn seconds_for(&self, class: &str) -> f64 {
        self.per_class.get(class).copied().unwrap_or(self.default)
    }

    pub fn duration_for(&self, class: &str) -> Duration {
        seconds_to_duration(self.seconds_for(class))
    }
}

impl DeploymentSettings {
    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        let settings: DeploymentSettings = serde_json::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let detection = &self.detection_settings;
        ensure_non_negative("vehicle_speed_kph", detection.vehicle_speed_kph)?;
        ensure_non_negative("low_speed_kph", detection.low_speed_kph)?;
        ensure_non_negative("shot_interval_sec", detection.shot_interval_sec)?;
        ensure_non_negative("cooldown_sec.default", detection.cooldown_sec.default)?;
        for (class, seconds) in &detection.cooldown_sec.per_class {
            if !seconds.is_finite() || *seconds < 0.0 {
                return Err(ConfigError::InvalidSetting {
                    field: "cooldown_sec",
                    reason: format!("cooldown for `{}` must be a non-negative number", class),
                });
            }
        }
        if detection.low_speed_kph > detection.vehicle_speed_kph {
            return Err(ConfigError::InvalidSetting {
                field: "low_speed_kph",
                reason: format!(
                    "{} exceeds vehicle_speed_kph {}",
                    detection.low_speed_kph, detection.vehicle_speed_kph
                ),
            });
        }
        if !is_known_bearing(self.bearing) {
            warn!(
                "bearing {} is not one of 0/90/180/270; directions will be camera-relative",
                self.bearing
            );
        }
        Ok(())
    }

    pub fn high_speed_kph(&self) -> f64 {
        self.detection_settings.vehicle_speed_kph
    }

    pub fn low_speed_kph(&self) -> f64 {
        self.detection_settings.low_speed_kph
    }

    pub fn shot_interval(&self) -> Duration {
        seconds_to_duration(self.detection_settings.shot_interval_sec)
    }

    pub fn vehicle_classes(&self) -> &BTreeSet<String> {
        &self.detection_settings.vehicle_classes
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.detection_settings.cooldown_sec
    }
}

fn ensure_non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSetting {
            field,
            reason: format!("expected a non-negative number, got {}", value),
        })
    }
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_default()
}

/// The configuration UI stores the bearing as whatever the form submitted.
#[derive(Deserialize)]
#[serde(untagged)]
enum BearingValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn deserialize_bearing<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<BearingValue>::deserialize(deserializer)?;
    let bearing = match value {
        None => 0,
        Some(BearingValue::Integer(value)) => value,
        Some(BearingValue::Float(value)) => value.trunc() as i64,
        Some(BearingValue::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("bearing `{}` is not an integer", text)))?,
    };
    i32::try_from(bearing).map_err(|_| D::Error::custom(format!("bearing {} out of range", bearing)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_detection_settings_fall_back_to_defaults() {
        let settings = DeploymentSettings::from_json_str(r#"{"bearing": 90}"#).unwrap();
        assert_eq!(settings.bearing, 90);
        assert_eq!(settings.high_speed_kph(), 8.0);
        assert_eq!(settings.low_speed_kph(), 2.0);
        assert_eq!(settings.shot_interval(), Duration::from_millis(250));
        assert!(settings.vehicle_classes().contains("truck"));
        assert_eq!(settings.cooldowns().seconds_for("bicycle"), 8.0);
    }

    #[test]
    fn bearing_accepts_numeric_strings_and_null() {
        let text = DeploymentSettings::from_json_str(r#"{"bearing": "270"}"#).unwrap();
        assert_eq!(text.bearing, 270);
        let null = DeploymentSettings::from_json_str(r#"{"bearing": null}"#).unwrap();
        assert_eq!(null.bearing, 0);
        assert!(DeploymentSettings::from_json_str(r#"{"bearing": "north"}"#).is_err());
    }

    #[test]
    fn partial_cooldown_table_replaces_class_overrides() {
        let json = r#"{"detection_settings": {"cooldown_sec": {"person": 2.0}}}"#;
        let settings = DeploymentSettings::from_json_str(json).unwrap();
        assert_eq!(settings.cooldowns().duration_for("person"), Duration::from_secs(2));
        assert_eq!(settings.cooldowns().seconds_for("bicycle"), 5.0);
        assert_eq!(settings.cooldowns().seconds_for("dog"), 5.0);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let json = r#"{"detection_settings": {"vehicle_speed_kph": 1.0, "low_speed_kph": 3.0}}"#;
        let err = DeploymentSettings::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                field: "low_speed_kph",
                ..
            }
        ));
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let json = r#"{"detection_settings": {"cooldown_sec": {"default": 5.0, "car": -1.0}}}"#;
        assert!(DeploymentSettings::from_json_str(json).is_err());
    }
}
