//! Session Registry (spec.md §4.1): PIN-keyed lookup table for live
//! sessions, backed by a single `DashMap` so lookups never contend on a
//! process-wide lock.

use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;

use crate::protocol::types::{HostId, Pin};
use crate::protocol::GameError;

use super::{Session, SessionPhase};

pub struct SessionRegistry {
    sessions: DashMap<Pin, Arc<Session>>,
    pin_retry_budget: u32,
}

impl SessionRegistry {
    pub fn new(pin_retry_budget: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            pin_retry_budget,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn get(&self, pin: &str) -> Option<Arc<Session>> {
        self.sessions.get(pin).map(|r| Arc::clone(r.value()))
    }

    pub fn remove(&self, pin: &str) -> Option<Arc<Session>> {
        self.sessions.remove(pin).map(|(_, s)| s)
    }

    /// Creates a fresh session under a freshly generated PIN, retrying on
    /// collision up to the configured budget before giving up
    /// (spec.md §4.1: "practical cap" on retries).
    pub fn create(&self, host_name: String) -> Result<(Arc<Session>, HostId), GameError> {
        for _ in 0..self.pin_retry_budget {
            let code = rand::rng().random_range(1000..=9999u16);
            let pin = Pin::from_code(code);
            if self.sessions.contains_key(&pin) {
                continue;
            }
            let (session, host_id) = Session::new(pin.clone(), host_name);
            let session = Arc::new(session);
            // Re-check under the shard lock `entry` takes; a racing insert
            // between the `contains_key` probe and here just means this
            // attempt loses and retries with a fresh PIN.
            match self.sessions.entry(pin) {
                dashmap::mapref::entry::Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(&session));
                    return Ok((session, host_id));
                }
                dashmap::mapref::entry::Entry::Occupied(_) => continue,
            }
        }
        Err(GameError::PinExhausted)
    }

    /// Sweeps every session in `ended` state (janitor task, spec.md §4.5).
    /// Returns the number of sessions removed.
    pub async fn sweep_ended(&self) -> usize {
        let mut to_remove = Vec::new();
        for entry in self.sessions.iter() {
            if entry.value().state().await == SessionPhase::Ended {
                to_remove.push(entry.key().clone());
            }
        }
        let count = to_remove.len();
        for pin in to_remove {
            self.sessions.remove(&pin);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_allocates_a_well_formed_pin() {
        let registry = SessionRegistry::new(20);
        let (session, _host_id) = registry.create("Alice".to_string()).unwrap();
        assert!(Pin::is_well_formed(session.pin.as_str()));
        assert!(registry.get(session.pin.as_str()).is_some());
    }

    #[test]
    fn create_fails_once_the_pin_space_is_exhausted() {
        let registry = SessionRegistry::new(5);
        // Fill the entire 4-digit PIN space so every retry collides.
        for code in 1000u16..=9999u16 {
            let pin = Pin::from_code(code);
            let (session, _) = Session::new(pin.clone(), "host".to_string());
            registry.sessions.insert(pin, Arc::new(session));
        }
        let result = registry.create("Bob".to_string());
        assert!(matches!(result, Err(GameError::PinExhausted)));
    }

    #[test]
    fn remove_forgets_the_session() {
        let registry = SessionRegistry::new(20);
        let (session, _) = registry.create("Alice".to_string()).unwrap();
        let pin = session.pin.as_str().to_string();
        assert!(registry.remove(&pin).is_some());
        assert!(registry.get(&pin).is_none());
    }
}
