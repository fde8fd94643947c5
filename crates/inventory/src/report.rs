//! Rows handed to the PDF/spreadsheet export collaborator.

use serde::{Deserialize, Serialize};

use crate::part::Part;
use crate::status::StockClassification;

pub const BELOW_MINIMUM_TEXT: &str = "Below minimum";
pub const NORMAL_TEXT: &str = "Normal";

/// One tabular row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub code: String,
    pub name: String,
    pub category: String,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub unit: String,
    /// "Below minimum" when strictly under the threshold, else "Normal".
    pub status_text: String,
    pub status: StockClassification,
}

impl From<&Part> for ReportRow {
    fn from(part: &Part) -> Self {
        let status_text = if part.is_below_minimum() {
            BELOW_MINIMUM_TEXT
        } else {
            NORMAL_TEXT
        };
        Self {
            code: part.code().to_string(),
            name: part.name().to_string(),
            category: part.category().to_string(),
            current_stock: part.current_stock(),
            minimum_stock: part.minimum_stock(),
            unit: part.unit().to_string(),
            status_text: status_text.to_string(),
            status: part.classification(),
        }
    }
}

/// A titled list of rows; rendering is someone else's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    /// File name without extension.
    pub filename: String,
    pub rows: Vec<ReportRow>,
}

/// Parts at or below their minimum.
pub fn low_stock_report(parts: &[Part]) -> Report {
    Report {
        title: "Low stock report".to_string(),
        filename: "low-stock".to_string(),
        rows: parts
            .iter()
            .filter(|p| p.is_at_or_below_minimum())
            .map(ReportRow::from)
            .collect(),
    }
}

/// Every part.
pub fn stock_report(parts: &[Part]) -> Report {
    Report {
        title: "Stock report".to_string(),
        filename: "stock".to_string(),
        rows: parts.iter().map(ReportRow::from).collect(),
    }
}
