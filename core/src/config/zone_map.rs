use log::warn;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::prelude::{ConfigError, ConfigResult};

pub const DEFAULT_GRID_COLS: usize = 32;
pub const DEFAULT_GRID_ROWS: usize = 18;

/// Contents of `zone_map.json` as written by the configuration UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawZoneMap {
    #[serde(default = "default_dims")]
    pub dims: [usize; 2],
    #[serde(default)]
    pub zones: BTreeMap<String, String>,
    #[serde(default)]
    pub map: Option<Vec<Vec<u32>>>,
}

fn default_dims() -> [usize; 2] {
    [DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS]
}

/// Validated classification grid: `rows x cols` zone ids plus their names.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMap {
    grid: Array2<u32>,
    names: BTreeMap<u32, String>,
}

impl ZoneMap {
    /// Builds a map from row-major zone ids; `grid` must be exactly `rows x cols`.
    pub fn new(
        cols: usize,
        rows: usize,
        grid: Vec<Vec<u32>>,
        names: BTreeMap<u32, String>,
    ) -> ConfigResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(ConfigError::InvalidZoneMap(format!(
                "grid dimensions {}x{} must be non-zero",
                cols, rows
            )));
        }
        if grid.len() != rows {
            return Err(ConfigError::InvalidZoneMap(format!(
                "expected {} rows, found {}",
                rows,
                grid.len()
            )));
        }
        if let Some((index, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(ConfigError::InvalidZoneMap(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                cols
            )));
        }

        let cells: Vec<u32> = grid.into_iter().flatten().collect();
        let grid = Array2::from_shape_vec((rows, cols), cells)
            .map_err(|err| ConfigError::InvalidZoneMap(err.to_string()))?;
        Ok(Self { grid, names })
    }

    /// Every cell carries the same zone id.
    pub fn uniform(cols: usize, rows: usize, id: u32, names: BTreeMap<u32, String>) -> ConfigResult<Self> {
        Self::new(cols, rows, vec![vec![id; cols]; rows], names)
    }

    pub fn from_raw(raw: RawZoneMap) -> ConfigResult<Self> {
        let [cols, rows] = raw.dims;
        let grid = raw
            .map
            .ok_or_else(|| ConfigError::InvalidZoneMap("zone grid `map` is missing".into()))?;

        let mut names = BTreeMap::new();
        for (key, name) in raw.zones {
            match key.trim().parse::<u32>() {
                Ok(id) => {
                    names.insert(id, name);
                }
                Err(_) => warn!("ignoring zone name `{}` with non-numeric id `{}`", name, key),
            }
        }

        Self::new(cols, rows, grid, names)
    }

    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        let raw: RawZoneMap = serde_json::from_str(contents)?;
        Self::from_raw(raw)
    }

    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    pub fn zone_id(&self, row: usize, col: usize) -> Option<u32> {
        self.grid.get((row, col)).copied()
    }

    pub fn zone_name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Zone names the configuration UI writes for every deployment.
pub fn default_zone_names() -> BTreeMap<u32, String> {
    BTreeMap::from([
        (0, "ignore".to_string()),
        (1, "road".to_string()),
        (2, "sidewalk".to_string()),
        (3, "bike_lane".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_map_parses_ui_layout() {
        let json = r#"{
            "dims": [3, 2],
            "zones": {"0": "ignore", "1": "road", "2": "sidewalk"},
            "map": [[0, 1, 2], [1, 1, 2]]
        }"#;
        let map = ZoneMap::from_json_str(json).unwrap();
        assert_eq!((map.cols(), map.rows()), (3, 2));
        assert_eq!(map.zone_id(0, 2), Some(2));
        assert_eq!(map.zone_id(1, 0), Some(1));
        assert_eq!(map.zone_name(0), Some("ignore"));
        assert_eq!(map.zone_id(2, 0), None);
    }

    #[test]
    fn missing_grid_is_fatal() {
        let err = ZoneMap::from_json_str(r#"{"dims": [32, 18], "zones": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoneMap(_)));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let err = ZoneMap::new(2, 2, vec![vec![1, 1], vec![1]], default_zone_names()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn non_numeric_zone_keys_are_skipped() {
        let json = r#"{"dims": [1, 1], "zones": {"road": "road", "1": "road"}, "map": [[1]]}"#;
        let map = ZoneMap::from_json_str(json).unwrap();
        assert_eq!(map.zone_name(1), Some("road"));
    }
}
