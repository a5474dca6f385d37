//! Key/value storage tiers and JSON snapshots over them.
//!
//! [`KeyValueStore`] mirrors the Web Storage API (`getItem`/`setItem`/
//! `removeItem`) so a browser `Storage` object and [`MemoryStorage`] can back
//! the same persistence controller.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};

use crate::core::error::StorageError;

/// A string key/value store.
pub trait KeyValueStore {
    /// Short tier name used in logs and errors ("ephemeral", "durable").
    fn tier(&self) -> &'static str;

    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and parse a JSON value.
///
/// Returns `None` if the key doesn't exist or deserialization fails.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("ignoring unreadable {key} in {} storage: {err}", store.tier());
            None
        }
    }
}

/// Serialize a value as JSON and store it.
pub fn set_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, data: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(data).map_err(|err| StorageError::SerializationFailed {
        key: key.to_string(),
        reason: err.to_string(),
    })?;
    store.set_item(key, &json)
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process store. Clones share the same map.
///
/// Keeping a clone of the durable store and reopening a file store over it
/// is how tests simulate a restart.
#[derive(Clone, Debug)]
pub struct MemoryStorage {
    tier: &'static str,
    items: Rc<RefCell<BTreeMap<String, String>>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new(tier: &'static str) -> Self {
        Self {
            tier,
            items: Rc::default(),
            read_only: false,
        }
    }

    /// A store that rejects every write, like a full browser quota.
    pub fn read_only(tier: &'static str) -> Self {
        Self {
            read_only: true,
            ..Self::new(tier)
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn tier(&self) -> &'static str {
        self.tier
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::WriteFailed {
                tier: self.tier,
                key: key.to_string(),
            });
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::WriteFailed {
                tier: self.tier,
                key: key.to_string(),
            });
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
