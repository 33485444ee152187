//! Persistence of the cached document.
//!
//! ## Storage key
//!
//! A single namespaced key, `$$markdown-online$$` unless configured otherwise,
//! holds the raw markdown text. It is written on every debounced commit and
//! read once at startup.

use std::cell::RefCell;
use std::collections::HashMap;

use smol_str::SmolStr;

use crate::error::StoreError;

/// Default key of the cached document.
pub const CACHE_KEY: &str = "$$markdown-online$$";

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    /// Stored value, or `None` if the key was never written (or storage is
    /// unreadable).
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store, for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    /// Simulated quota in bytes across all values.
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes which would exceed `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota: Some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(StoreError::Write("quota exceeded".into()));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The document cache: one backend, one fixed key.
pub struct PersistenceStore {
    backend: Box<dyn KeyValueStore>,
    key: SmolStr,
}

impl PersistenceStore {
    pub fn new(backend: impl KeyValueStore + 'static, key: impl Into<SmolStr>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the cached document.
    pub fn load(&self) -> Option<String> {
        self.backend.get(&self.key)
    }

    /// Overwrite the cached document. Failures are logged and dropped; the
    /// next commit tries again.
    pub fn save(&self, value: &str) {
        if let Err(e) = self.backend.set(&self.key, value) {
            tracing::warn!(key = %self.key, bytes = value.len(), "failed to persist document: {}", e);
        }
    }
}
