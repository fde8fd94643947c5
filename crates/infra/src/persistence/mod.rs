//! Persistence gateway: an opaque key/value store holding one serialized
//! collection per key.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::JsonFileStore;
pub use in_memory::InMemoryKeyValueStore;

/// Slot holding the serialized part list.
pub const PARTS_KEY: &str = "inventory-parts";
/// Slot holding the serialized movement list.
pub const MOVEMENTS_KEY: &str = "inventory-movements";
/// Slot holding the serialized category list.
pub const CATEGORIES_KEY: &str = "inventory-categories";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt blob under '{key}': {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed blob store.
///
/// `load` returns `Ok(None)` for a slot that was never written.
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).save(key, value)
    }
}

/// Load and decode a JSON array stored under `key`.
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Option<Vec<T>>, PersistenceError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(blob) = store.load(key)? else {
        return Ok(None);
    };
    let items = serde_json::from_str(&blob).map_err(|source| PersistenceError::Deserialize {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(items))
}

/// Encode `items` as a JSON array and store it under `key`.
pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), PersistenceError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let blob = serde_json::to_string(items).map_err(|source| PersistenceError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &blob)
}
