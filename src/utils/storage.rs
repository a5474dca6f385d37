//! Web Storage tiers.
//!
//! sessionStorage backs the ephemeral tier and localStorage the durable one.
//! When either is blocked (private mode, sandboxed iframe) the tier falls back
//! to an in-memory store for the lifetime of the page.

use novashell_core::{KeyValueStore, MemoryStorage, StorageError};
use web_sys::Storage;

use super::dom;

pub const EPHEMERAL_TIER: &str = "ephemeral";
pub const DURABLE_TIER: &str = "durable";

/// A `web_sys::Storage` object tagged with its tier name.
pub struct BrowserStorage {
    tier: &'static str,
    storage: Storage,
}

impl BrowserStorage {
    /// sessionStorage, if the page may use it.
    pub fn session() -> Option<Self> {
        dom::session_storage().map(|storage| Self {
            tier: EPHEMERAL_TIER,
            storage,
        })
    }

    /// localStorage, if the page may use it.
    pub fn local() -> Option<Self> {
        dom::local_storage().map(|storage| Self {
            tier: DURABLE_TIER,
            storage,
        })
    }
}

impl KeyValueStore for BrowserStorage {
    fn tier(&self) -> &'static str {
        self.tier
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::WriteFailed {
                tier: self.tier,
                key: key.to_string(),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::WriteFailed {
                tier: self.tier,
                key: key.to_string(),
            })
    }
}

/// Pick the browser store for a tier, or an in-memory stand-in.
pub fn tier_or_memory(store: Option<BrowserStorage>, tier: &'static str) -> Box<dyn KeyValueStore> {
    match store {
        Some(store) => Box::new(store),
        None => {
            log::warn!("{}", StorageError::Unavailable { tier });
            Box::new(MemoryStorage::new(tier))
        }
    }
}
