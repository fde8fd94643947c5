//! Infrastructure layer: persistence gateway, configuration, and the inventory
//! store that ties the domain to them.

pub mod config;
pub mod persistence;
pub mod store;

pub use config::{ConfigError, LedgerPolicy, NegativeStockPolicy, StoreConfig};
pub use persistence::{InMemoryKeyValueStore, JsonFileStore, KeyValueStore, PersistenceError};
pub use store::{InventoryStore, PersistenceWarning};
