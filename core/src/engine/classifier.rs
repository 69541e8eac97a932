use std::time::Instant;

use crate::classify::CooldownRegistry;

/// Classes that justify a capture at walking speed.
pub const SLOW_CLASSES: [&str; 2] = ["person", "bicycle"];

/// Speed bucket of a radar reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Ignore,
    LowSpeed,
    HighSpeed,
}

/// What the engine should do with a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDecision {
    NoAction,
    /// Low-speed reading while every slow class is on cooldown.
    Suppressed,
    TwoShot,
    ConditionalShot,
}

#[derive(Debug, Clone, Copy)]
pub struct RadarEventClassifier {
    high_speed_kph: f64,
    low_speed_kph: f64,
}

impl RadarEventClassifier {
    pub fn new(high_speed_kph: f64, low_speed_kph: f64) -> Self {
        Self {
            high_speed_kph,
            low_speed_kph,
        }
    }

    pub fn bucket(&self, speed_kph: f64) -> EventClass {
        if speed_kph >= self.high_speed_kph {
            EventClass::HighSpeed
        } else if speed_kph >= self.low_speed_kph {
            EventClass::LowSpeed
        } else {
            EventClass::Ignore
        }
    }

    pub fn decide(&self, speed_kph: f64, cooldowns: &CooldownRegistry, now: Instant) -> EventDecision {
        match self.bucket(speed_kph) {
            EventClass::HighSpeed => EventDecision::TwoShot,
            EventClass::LowSpeed => {
                if SLOW_CLASSES
                    .iter()
                    .any(|class| cooldowns.is_available(class, now))
                {
                    EventDecision::ConditionalShot
                } else {
                    EventDecision::Suppressed
                }
            }
            EventClass::Ignore => EventDecision::NoAction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn classifier() -> RadarEventClassifier {
        RadarEventClassifier::new(8.0, 2.0)
    }

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        let classifier = classifier();
        assert_eq!(classifier.bucket(1.99), EventClass::Ignore);
        assert_eq!(classifier.bucket(2.0), EventClass::LowSpeed);
        assert_eq!(classifier.bucket(7.99), EventClass::LowSpeed);
        assert_eq!(classifier.bucket(8.0), EventClass::HighSpeed);
    }

    #[test]
    fn high_speed_ignores_cooldowns() {
        let now = Instant::now();
        let mut cooldowns = CooldownRegistry::new();
        for class in ["car", "person", "bicycle"] {
            cooldowns.extend(class, now + Duration::from_secs(60));
        }
        assert_eq!(classifier().decide(30.0, &cooldowns, now), EventDecision::TwoShot);
    }

    #[test]
    fn low_speed_needs_one_slow_class_off_cooldown() {
        let now = Instant::now();
        let mut cooldowns = CooldownRegistry::new();
        cooldowns.extend("person", now + Duration::from_secs(5));
        assert_eq!(
            classifier().decide(3.0, &cooldowns, now),
            EventDecision::ConditionalShot
        );

        cooldowns.extend("bicycle", now + Duration::from_secs(8));
        assert_eq!(classifier().decide(3.0, &cooldowns, now), EventDecision::Suppressed);
        assert_eq!(
            classifier().decide(3.0, &cooldowns, now + Duration::from_secs(5)),
            EventDecision::ConditionalShot
        );
    }

    #[test]
    fn slow_reading_takes_no_action() {
        assert_eq!(
            classifier().decide(0.5, &CooldownRegistry::new(), Instant::now()),
            EventDecision::NoAction
        );
    }
}
