pub mod cooldown;
pub mod direction;
pub mod primary;
pub mod zone;

pub use cooldown::CooldownRegistry;
pub use direction::{Compass, Direction, DirectionEstimator, RelativeDirection};
pub use primary::PrimaryTargetSelector;
pub use zone::{Zone, ZoneClassifier, IGNORE_ZONE};
