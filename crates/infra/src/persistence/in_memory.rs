use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, PersistenceError};

/// In-memory key/value store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let map = self
            .inner
            .read()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
