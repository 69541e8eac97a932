use serde::{Serialize, Serializer};
use std::fmt;

use crate::prelude::Position;

/// Displacements smaller than this on both axes count as no movement.
pub const STATIONARY_THRESHOLD_PX: f32 = 5.0;

/// Direction of travel in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl RelativeDirection {
    /// Buckets an image-space angle in degrees (y grows downward).
    pub fn from_angle(degrees: f32) -> Self {
        if (-45.0..=45.0).contains(&degrees) {
            RelativeDirection::Right
        } else if degrees > 45.0 && degrees < 135.0 {
            RelativeDirection::Down
        } else if degrees > -135.0 && degrees < -45.0 {
            RelativeDirection::Up
        } else {
            RelativeDirection::Left
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RelativeDirection::Up => "Up",
            RelativeDirection::Down => "Down",
            RelativeDirection::Left => "Left",
            RelativeDirection::Right => "Right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    pub fn label(&self) -> &'static str {
        match self {
            Compass::North => "N",
            Compass::East => "E",
            Compass::South => "S",
            Compass::West => "W",
        }
    }
}

/// Compass headings for a camera-relative (up, down, left, right) move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CompassRow {
    up: Compass,
    down: Compass,
    left: Compass,
    right: Compass,
}

impl CompassRow {
    fn heading(&self, relative: RelativeDirection) -> Compass {
        match relative {
            RelativeDirection::Up => self.up,
            RelativeDirection::Down => self.down,
            RelativeDirection::Left => self.left,
            RelativeDirection::Right => self.right,
        }
    }
}

const BEARING_TABLE: [(i32, CompassRow); 4] = {
    use Compass::*;
    [
        (0, CompassRow { up: North, down: South, left: West, right: East }),
        (90, CompassRow { up: East, down: West, left: North, right: South }),
        (180, CompassRow { up: South, down: North, left: East, right: West }),
        (270, CompassRow { up: West, down: East, left: South, right: North }),
    ]
};

pub fn is_known_bearing(bearing: i32) -> bool {
    BEARING_TABLE.iter().any(|(known, _)| *known == bearing)
}

/// Reported direction of travel for the primary target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Heading(Compass),
    /// Camera bearing has no compass mapping.
    Relative(RelativeDirection),
    Stationary,
    Unavailable,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Heading(compass) => f.write_str(compass.label()),
            Direction::Relative(relative) => write!(f, "Rel_{}", relative.label()),
            Direction::Stationary => f.write_str("Stationary"),
            Direction::Unavailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Turns two sightings of the same object into a direction label.
#[derive(Debug, Clone, Copy)]
pub struct DirectionEstimator {
    row: Option<CompassRow>,
}

impl DirectionEstimator {
    pub fn new(bearing: i32) -> Self {
        let row = BEARING_TABLE
            .iter()
            .find(|(known, _)| *known == bearing)
            .map(|(_, row)| *row);
        Self { row }
    }

    pub fn estimate(&self, start: Position, end: Position) -> Direction {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx.abs() < STATIONARY_THRESHOLD_PX && dy.abs() < STATIONARY_THRESHOLD_PX {
            return Direction::Stationary;
        }

        let relative = RelativeDirection::from_angle(dy.atan2(dx).to_degrees());
        match self.row {
            Some(row) => Direction::Heading(row.heading(relative)),
            None => Direction::Relative(relative),
        }
    }
}
