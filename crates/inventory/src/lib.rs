//! Inventory domain module.
//!
//! Parts, the stock-movement ledger, categories, and the views derived from
//! them (stock classification, dashboard, report rows). Pure domain logic:
//! no IO, no storage.

pub mod category;
pub mod dashboard;
pub mod ledger;
pub mod movement;
pub mod part;
pub mod query;
pub mod report;
pub mod status;

pub use category::{Category, default_categories};
pub use dashboard::{DashboardSummary, RECENT_MOVEMENTS_LIMIT, summarize};
pub use movement::{Movement, MovementDraft, MovementType, Quantity};
pub use part::{Part, PartDraft, PartPatch};
pub use query::{MovementFilter, MovementTotals, PartFilter};
pub use report::{Report, ReportRow, low_stock_report, stock_report};
pub use status::{StatusColor, StockClassification, StockStatus, classify};
