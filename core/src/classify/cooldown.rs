use std::collections::HashMap;
use std::time::Instant;

/// Per-class suppression clock. A class is on cooldown while `now < expiry`.
#[derive(Debug, Default)]
pub struct CooldownRegistry {
    expiries: HashMap<String, Instant>,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, class: &str, now: Instant) -> bool {
        self.expiries
            .get(class)
            .map_or(false, |expiry| now < *expiry)
    }

    pub fn is_available(&self, class: &str, now: Instant) -> bool {
        !self.is_active(class, now)
    }

    pub fn expiry(&self, class: &str) -> Option<Instant> {
        self.expiries.get(class).copied()
    }

    /// Pushes the expiry for `class` out to `until`. Never moves it earlier.
    pub fn extend(&mut self, class: &str, until: Instant) {
        match self.expiries.get_mut(class) {
            Some(expiry) => {
                if until > *expiry {
                    *expiry = until;
                }
            }
            None => {
                self.expiries.insert(class.to_string(), until);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unknown_class_is_available() {
        let registry = CooldownRegistry::new();
        assert!(registry.is_available("person", Instant::now()));
    }

    #[test]
    fn cooldown_expires_at_the_expiry_instant() {
        let start = Instant::now();
        let mut registry = CooldownRegistry::new();
        registry.extend("person", start + Duration::from_secs(5));

        assert!(registry.is_active("person", start + Duration::from_secs(4)));
        assert!(registry.is_available("person", start + Duration::from_secs(5)));
    }

    #[test]
    fn extend_never_shortens() {
        let start = Instant::now();
        let mut registry = CooldownRegistry::new();
        registry.extend("bicycle", start + Duration::from_secs(8));
        registry.extend("bicycle", start + Duration::from_secs(3));
        assert_eq!(registry.expiry("bicycle"), Some(start + Duration::from_secs(8)));

        registry.extend("bicycle", start + Duration::from_secs(10));
        assert_eq!(registry.expiry("bicycle"), Some(start + Duration::from_secs(10)));
        assert_eq!(registry.len(), 1);
    }
}
