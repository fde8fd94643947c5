//! Dashboard summary, recomputed from scratch on every call.

use serde::{Deserialize, Serialize};

use crate::ledger::recent_movements;
use crate::movement::Movement;
use crate::part::Part;
use crate::query::MovementTotals;

/// Default length of `recent_movements`.
pub const RECENT_MOVEMENTS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_parts: usize,
    /// Parts strictly below their minimum (out-of-stock and low together).
    pub low_stock_parts: Vec<Part>,
    pub low_stock_count: usize,
    /// Most recent movements by date, newest first.
    pub recent_movements: Vec<Movement>,
    /// Entries among `recent_movements`.
    pub recent_entries: usize,
    /// Exits among `recent_movements`.
    pub recent_exits: usize,
}

/// Derive the dashboard from current state. No caching, no history.
pub fn summarize(parts: &[Part], movements: &[Movement], recent_limit: usize) -> DashboardSummary {
    let low_stock_parts: Vec<Part> = parts.iter().filter(|p| p.is_below_minimum()).cloned().collect();
    let recent = recent_movements(movements, recent_limit);
    let totals = MovementTotals::count(&recent);

    DashboardSummary {
        total_parts: parts.len(),
        low_stock_count: low_stock_parts.len(),
        low_stock_parts,
        recent_entries: totals.entries,
        recent_exits: totals.exits,
        recent_movements: recent,
    }
}
