use std::collections::HashMap;

use rand::Rng;
use tracing::warn;

use crate::ids::{IdKind, IdSource};

/// Driver id → session id, stable for the lifetime of a run.
#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    by_driver: HashMap<String, String>,
    /// Drivers in first-seen order, for reproducible reuse picks.
    drivers: Vec<String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `driver_id`. The first call records `requested` (or a fresh
    /// id); later calls return the recorded session.
    pub fn resolve(
        &mut self,
        driver_id: &str,
        requested: Option<String>,
        ids: &mut dyn IdSource,
    ) -> String {
        if let Some(existing) = self.by_driver.get(driver_id) {
            if let Some(requested) = requested.filter(|r| r != existing) {
                warn!(
                    driver_id,
                    existing = %existing,
                    requested = %requested,
                    "ignoring session id that conflicts with the registered session"
                );
            }
            return existing.clone();
        }

        let session = requested.unwrap_or_else(|| ids.next_id(IdKind::Session));
        self.by_driver.insert(driver_id.to_string(), session.clone());
        self.drivers.push(driver_id.to_string());
        session
    }

    pub fn session(&self, driver_id: &str) -> Option<&str> {
        self.by_driver.get(driver_id).map(String::as_str)
    }

    pub fn drivers(&self) -> &[String] {
        &self.drivers
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

/// Passenger ids seen so far, so later requests can come from repeat riders.
#[derive(Debug, Clone)]
pub struct PassengerPool {
    passengers: Vec<String>,
    repeat_probability: f64,
}

impl PassengerPool {
    pub fn new(repeat_probability: f64) -> Self {
        Self {
            passengers: Vec::new(),
            repeat_probability,
        }
    }

    /// An existing passenger with `repeat_probability`, otherwise a new one.
    pub fn next_passenger<R: Rng + ?Sized>(&mut self, ids: &mut dyn IdSource, rng: &mut R) -> String {
        if !self.passengers.is_empty() && rng.gen_bool(self.repeat_probability) {
            let idx = rng.gen_range(0..self.passengers.len());
            return self.passengers[idx].clone();
        }
        let id = ids.next_id(IdKind::Passenger);
        self.passengers.push(id.clone());
        id
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn session_is_created_once_per_driver() {
        let mut ids = SequentialIds::new();
        let mut registry = SessionRegistry::new();
        let first = registry.resolve("D000000", None, &mut ids);
        let again = registry.resolve("D000000", None, &mut ids);
        let other = registry.resolve("D000001", None, &mut ids);
        assert_eq!(first, "S000000");
        assert_eq!(again, first);
        assert_eq!(other, "S000001");
        assert_eq!(registry.drivers(), ["D000000", "D000001"]);
    }

    #[test]
    fn caller_session_is_kept_on_first_use_only() {
        let mut ids = SequentialIds::new();
        let mut registry = SessionRegistry::new();
        let session = registry.resolve("D1", Some("custom".into()), &mut ids);
        assert_eq!(session, "custom");
        let conflicting = registry.resolve("D1", Some("other".into()), &mut ids);
        assert_eq!(conflicting, "custom");
        assert_eq!(registry.session("D1"), Some("custom"));
    }

    #[test]
    fn pool_without_repeats_always_mints_new_ids() {
        let mut ids = SequentialIds::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = PassengerPool::new(0.0);
        let a = pool.next_passenger(&mut ids, &mut rng);
        let b = pool.next_passenger(&mut ids, &mut rng);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn pool_with_certain_repeats_reuses_first_passenger() {
        let mut ids = SequentialIds::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = PassengerPool::new(1.0);
        let first = pool.next_passenger(&mut ids, &mut rng);
        for _ in 0..20 {
            assert_eq!(pool.next_passenger(&mut ids, &mut rng), first);
        }
        assert_eq!(pool.len(), 1);
    }
}
