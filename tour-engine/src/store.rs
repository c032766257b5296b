//! Durable "already seen" flags, one per tour id.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

/// Prefix of every persisted completion key. Changing it resurfaces every tour.
pub const COMPLETION_KEY_PREFIX: &str = "onboarding-";

/// Value stored under a completion key.
pub const COMPLETED_VALUE: &str = "completed";

/// Storage key holding the completion flag of `tour_id`.
#[must_use]
pub fn completion_key(tour_id: &str) -> String {
    format!("{COMPLETION_KEY_PREFIX}{tour_id}")
}

/// Errors reported by a flag store. The controller never surfaces these to users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagStoreError {
    #[error("flag storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Persistent completion flag per tour id.
///
/// A missing key is a normal state and reads as "not completed".
pub trait FlagStore {
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn is_completed(&self, tour_id: &str) -> Result<bool, FlagStoreError>;

    /// # Errors
    ///
    /// Returns an error if the flag cannot be written.
    fn mark_completed(&self, tour_id: &str) -> Result<(), FlagStoreError>;

    /// # Errors
    ///
    /// Returns an error if the flag cannot be removed.
    fn reset(&self, tour_id: &str) -> Result<(), FlagStoreError>;
}

impl<T: FlagStore + ?Sized> FlagStore for Rc<T> {
    fn is_completed(&self, tour_id: &str) -> Result<bool, FlagStoreError> {
        (**self).is_completed(tour_id)
    }

    fn mark_completed(&self, tour_id: &str) -> Result<(), FlagStoreError> {
        (**self).mark_completed(tour_id)
    }

    fn reset(&self, tour_id: &str) -> Result<(), FlagStoreError> {
        (**self).reset(tour_id)
    }
}

/// In-process store using the same key scheme as browser storage.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    fail_writes: bool,
}

impl MemoryFlagStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising degraded persistence.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Raw value under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of successful `mark_completed` writes.
    #[must_use]
    pub fn completion_writes(&self) -> usize {
        self.writes.get()
    }
}

impl FlagStore for MemoryFlagStore {
    fn is_completed(&self, tour_id: &str) -> Result<bool, FlagStoreError> {
        Ok(self
            .entries
            .borrow()
            .get(&completion_key(tour_id))
            .is_some_and(|value| value == COMPLETED_VALUE))
    }

    fn mark_completed(&self, tour_id: &str) -> Result<(), FlagStoreError> {
        let key = completion_key(tour_id);
        if self.fail_writes {
            return Err(FlagStoreError::Write {
                key,
                reason: "writes disabled".into(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key, COMPLETED_VALUE.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn reset(&self, tour_id: &str) -> Result<(), FlagStoreError> {
        let key = completion_key(tour_id);
        if self.fail_writes {
            return Err(FlagStoreError::Write {
                key,
                reason: "writes disabled".into(),
            });
        }
        self.entries.borrow_mut().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_scheme_is_stable() {
        assert_eq!(completion_key("employer-home"), "onboarding-employer-home");
    }

    #[test]
    fn unknown_ids_read_as_not_completed() {
        let store = MemoryFlagStore::new();
        assert_eq!(store.is_completed("never-seen"), Ok(false));
    }

    #[test]
    fn mark_then_reset_round_trips_the_flag() {
        let store = MemoryFlagStore::new();
        store.mark_completed("admin").unwrap();
        assert_eq!(store.is_completed("admin"), Ok(true));
        assert_eq!(store.raw("onboarding-admin").as_deref(), Some("completed"));
        store.reset("admin").unwrap();
        assert_eq!(store.is_completed("admin"), Ok(false));
        assert_eq!(store.raw("onboarding-admin"), None);
        assert_eq!(store.completion_writes(), 1);
    }

    #[test]
    fn reset_of_missing_key_is_not_an_error() {
        assert!(MemoryFlagStore::new().reset("ghost").is_ok());
    }

    #[test]
    fn failing_store_reports_write_errors() {
        let store = MemoryFlagStore::failing();
        let err = store.mark_completed("x").unwrap_err();
        assert!(matches!(err, FlagStoreError::Write { ref key, .. } if key == "onboarding-x"));
        assert_eq!(store.is_completed("x"), Ok(false));
    }

    #[test]
    fn shared_store_forwards_through_rc() {
        let store = Rc::new(MemoryFlagStore::new());
        let handle: Rc<MemoryFlagStore> = Rc::clone(&store);
        handle.mark_completed("shared").unwrap();
        assert_eq!(store.is_completed("shared"), Ok(true));
    }
}
