//! Stock classification.
//!
//! Maps a (current, minimum) stock pair to a status category and a colour
//! token. The UI badge and the report rows both read from here, so the
//! thresholds live in exactly one place.

use serde::{Deserialize, Serialize};

use stockroom_core::ValueObject;

/// Stock status category. Rules are evaluated in declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// `current <= 0`.
    OutOfStock,
    /// `current < minimum`.
    Low,
    /// `current < minimum * 1.5`.
    Medium,
    Healthy,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::Low => "Low stock",
            StockStatus::Medium => "Medium stock",
            StockStatus::Healthy => "Healthy stock",
        }
    }

    pub fn color(&self) -> StatusColor {
        match self {
            StockStatus::OutOfStock => StatusColor::Red,
            StockStatus::Low => StatusColor::Yellow,
            StockStatus::Medium => StatusColor::Blue,
            StockStatus::Healthy => StatusColor::Green,
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display colour token for a status badge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Red,
    Yellow,
    Blue,
    Green,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Red => "red",
            StatusColor::Yellow => "yellow",
            StatusColor::Blue => "blue",
            StatusColor::Green => "green",
        }
    }
}

/// Result of [`classify`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockClassification {
    pub status: StockStatus,
    pub color: StatusColor,
}

impl ValueObject for StockClassification {}

/// Classify a stock level against its reorder threshold.
///
/// The "medium" band is `current < minimum * 1.5`, evaluated in integers as
/// `2 * current < 3 * minimum` so there is no float rounding at the edge.
/// With `minimum == 0` every positive stock is `Healthy`.
pub fn classify(current_stock: i64, minimum_stock: i64) -> StockClassification {
    let current = i128::from(current_stock);
    let minimum = i128::from(minimum_stock);

    let status = if current <= 0 {
        StockStatus::OutOfStock
    } else if current < minimum {
        StockStatus::Low
    } else if current * 2 < minimum * 3 {
        StockStatus::Medium
    } else {
        StockStatus::Healthy
    };

    StockClassification {
        status,
        color: status.color(),
    }
}
