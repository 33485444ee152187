//! `localStorage` persistence.
//!
//! Values are stored verbatim rather than JSON encoded, so documents cached by
//! the plain-JS version of the page are read back as-is.

use markdown_online_core::{KeyValueStore, StoreError};

use crate::dom::describe;

/// `window.localStorage`, resolved once.
///
/// Storage can be missing (sandboxed frames, some private modes, disabled by
/// policy); in that case reads return `None` and writes fail with
/// `StoreError::Unavailable`.
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, documents will not persist");
        }
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    /// Remove `key`. Used by tests and by hosts that offer a "clear" action.
    pub fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write(describe(&e)))
    }
}
