//! `localStorage`-backed completion flags.
use tour_engine::{COMPLETED_VALUE, FlagStore, FlagStoreError, completion_key};

use crate::dom;

/// Completion flags under `onboarding-<tourId>` in the browser's `localStorage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalStorageFlagStore;

impl LocalStorageFlagStore {
    fn storage() -> Result<web_sys::Storage, FlagStoreError> {
        dom::local_storage()
            .map_err(|err| FlagStoreError::Unavailable(dom::js_error_message(&err)))
    }
}

impl FlagStore for LocalStorageFlagStore {
    fn is_completed(&self, tour_id: &str) -> Result<bool, FlagStoreError> {
        let key = completion_key(tour_id);
        let value = Self::storage()?
            .get_item(&key)
            .map_err(|err| FlagStoreError::Read {
                key,
                reason: dom::js_error_message(&err),
            })?;
        Ok(value.is_some_and(|v| v == COMPLETED_VALUE))
    }

    fn mark_completed(&self, tour_id: &str) -> Result<(), FlagStoreError> {
        let key = completion_key(tour_id);
        Self::storage()?
            .set_item(&key, COMPLETED_VALUE)
            .map_err(|err| FlagStoreError::Write {
                key,
                reason: dom::js_error_message(&err),
            })
    }

    fn reset(&self, tour_id: &str) -> Result<(), FlagStoreError> {
        let key = completion_key(tour_id);
        Self::storage()?
            .remove_item(&key)
            .map_err(|err| FlagStoreError::Write {
                key,
                reason: dom::js_error_message(&err),
            })
    }
}
