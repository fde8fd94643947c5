//! Read-side filters composed over the full part and movement sets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockroom_core::PartId;

use crate::ledger::sort_by_date_desc;
use crate::movement::{Movement, MovementType};
use crate::part::Part;

/// Movement list filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFilter {
    pub kind: Option<MovementType>,
    pub part_id: Option<PartId>,
    /// Exact calendar date (UTC) of `Movement::date`.
    pub date: Option<NaiveDate>,
}

impl MovementFilter {
    pub fn matches(&self, movement: &Movement) -> bool {
        self.kind.is_none_or(|k| movement.kind() == k)
            && self.part_id.is_none_or(|p| movement.part_id() == p)
            && self.date.is_none_or(|d| movement.date().date_naive() == d)
    }

    /// Matching movements, most recent first.
    pub fn apply(&self, movements: &[Movement]) -> Vec<Movement> {
        let mut out: Vec<Movement> = movements.iter().filter(|m| self.matches(m)).cloned().collect();
        sort_by_date_desc(&mut out);
        out
    }
}

/// Movement counts by type.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTotals {
    pub entries: usize,
    pub exits: usize,
}

impl MovementTotals {
    pub fn count<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> Self {
        movements
            .into_iter()
            .fold(Self::default(), |mut totals, m| {
                match m.kind() {
                    MovementType::Entry => totals.entries += 1,
                    MovementType::Exit => totals.exits += 1,
                }
                totals
            })
    }
}

/// Part list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartFilter {
    /// Case-insensitive substring of name or code.
    pub search: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
}

impl PartFilter {
    pub fn matches(&self, part: &Part) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                part.name().to_lowercase().contains(&term)
                    || part.code().to_lowercase().contains(&term)
            }
        };
        let category_ok = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => part.category() == category,
        };
        search_ok && category_ok
    }

    /// Matching parts, most recently updated first.
    pub fn apply(&self, parts: &[Part]) -> Vec<Part> {
        let mut out: Vec<Part> = parts.iter().filter(|p| self.matches(p)).cloned().collect();
        out.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        out
    }
}
