//! Store configuration, read from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `STOCKROOM_DATA_DIR` | `{os data dir}/stockroom` |
//! | `STOCKROOM_NEGATIVE_STOCK` | `allow` |
//! | `STOCKROOM_RECENT_MOVEMENTS` | `5` |

use std::path::PathBuf;

use thiserror::Error;

use stockroom_inventory::RECENT_MOVEMENTS_LIMIT;

pub const DATA_DIR_VAR: &str = "STOCKROOM_DATA_DIR";
pub const NEGATIVE_STOCK_VAR: &str = "STOCKROOM_NEGATIVE_STOCK";
pub const RECENT_MOVEMENTS_VAR: &str = "STOCKROOM_RECENT_MOVEMENTS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}' ({expected})")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("could not resolve a data directory; set STOCKROOM_DATA_DIR")]
    NoDataDir,
}

/// What the ledger does with an exit larger than the current stock.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum NegativeStockPolicy {
    /// Record it; stock goes negative and a warning is logged.
    #[default]
    Allow,
    /// Refuse it with an invariant violation.
    Reject,
}

impl core::str::FromStr for NegativeStockPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            _ => Err(ConfigError::InvalidValue {
                var: NEGATIVE_STOCK_VAR,
                value: s.to_string(),
                expected: "allow or reject",
            }),
        }
    }
}

/// Behavioural knobs of the inventory store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LedgerPolicy {
    pub negative_stock: NegativeStockPolicy,
    /// Length of the dashboard's recent-movement list.
    pub recent_movements: usize,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            negative_stock: NegativeStockPolicy::Allow,
            recent_movements: RECENT_MOVEMENTS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory of the JSON file store.
    pub data_dir: PathBuf,
    pub policy: LedgerPolicy,
}

impl StoreConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match lookup(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let negative_stock = match lookup(NEGATIVE_STOCK_VAR) {
            Some(value) => value.parse()?,
            None => NegativeStockPolicy::default(),
        };

        let recent_movements = match lookup(RECENT_MOVEMENTS_VAR) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: RECENT_MOVEMENTS_VAR,
                        value,
                        expected: "positive integer",
                    });
                }
            },
            None => RECENT_MOVEMENTS_LIMIT,
        };

        Ok(Self {
            data_dir,
            policy: LedgerPolicy {
                negative_stock,
                recent_movements,
            },
        })
    }
}

/// `{app_data_dir}/stockroom`.
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;
    Ok(base.join("stockroom"))
}
