use std::fmt;

use crate::config::ZoneMap;
use crate::prelude::{FrameSize, Position};

/// Zone name whose detections are never logged.
pub const IGNORE_ZONE: &str = "ignore";

/// Result of resolving a pixel position against the zone grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Zone {
    Named(String),
    Unknown,
    OutOfBounds,
}

impl Zone {
    pub fn is_ignore(&self) -> bool {
        matches!(self, Zone::Named(name) if name == IGNORE_ZONE)
    }

    pub fn name(&self) -> &str {
        match self {
            Zone::Named(name) => name,
            Zone::Unknown => "unknown",
            Zone::OutOfBounds => "out_of_bounds",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps pixel positions onto the deployment's zone grid.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    map: ZoneMap,
}

impl ZoneClassifier {
    pub fn new(map: ZoneMap) -> Self {
        Self { map }
    }

    /// Grid cell for `position`, truncating toward zero. `None` when outside the grid.
    pub fn cell(&self, position: Position, frame: FrameSize) -> Option<(usize, usize)> {
        if frame.width == 0 || frame.height == 0 {
            return None;
        }
        let col = ((position.x / frame.width as f32) * self.map.cols() as f32) as i64;
        let row = ((position.y / frame.height as f32) * self.map.rows() as f32) as i64;

        let in_cols = (0..self.map.cols() as i64).contains(&col);
        let in_rows = (0..self.map.rows() as i64).contains(&row);
        (in_cols && in_rows).then(|| (row as usize, col as usize))
    }

    pub fn classify(&self, position: Position, frame: FrameSize) -> Zone {
        let Some((row, col)) = self.cell(position, frame) else {
            return Zone::OutOfBounds;
        };
        self.map
            .zone_id(row, col)
            .and_then(|id| self.map.zone_name(id))
            .map_or(Zone::Unknown, |name| Zone::Named(name.to_string()))
    }
}
