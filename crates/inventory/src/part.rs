use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, PartId};

use crate::movement::Movement;
use crate::status::{StockClassification, classify};

/// A distinct stock-keeping unit.
///
/// `current_stock` caches the signed sum of every movement recorded against the
/// part. It has no setter: [`Part::apply_movement`] is the only writer, so the
/// cache cannot drift from the ledger through a stray field assignment.
///
/// Deserialization re-runs the creation checks (non-blank code and name,
/// non-negative minimum), so a persisted blob cannot carry a part that
/// [`Part::create`] would have refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PartRecord")]
pub struct Part {
    id: PartId,
    code: String,
    name: String,
    #[serde(default)]
    description: String,
    /// Category *name*, copied at assignment time. Renaming or deleting the
    /// category later does not touch this value.
    #[serde(default)]
    category: String,
    unit: String,
    minimum_stock: i64,
    current_stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Unchecked wire shape of [`Part`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartRecord {
    id: PartId,
    code: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    unit: String,
    minimum_stock: i64,
    current_stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PartRecord> for Part {
    type Error = DomainError;

    fn try_from(record: PartRecord) -> Result<Self, Self::Error> {
        ensure_not_blank("code", &record.code)?;
        ensure_not_blank("name", &record.name)?;
        ensure_minimum_stock(record.minimum_stock)?;

        Ok(Self {
            id: record.id,
            code: record.code,
            name: record.name,
            description: record.description,
            category: record.category,
            unit: record.unit,
            minimum_stock: record.minimum_stock,
            current_stock: record.current_stock,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Input for creating a part (no id, stock or timestamps).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDraft {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub unit: String,
    pub minimum_stock: i64,
}

/// Partial update for a part. `None` leaves the field as is.
///
/// Stock is deliberately absent: it only moves through the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub minimum_stock: Option<i64>,
}

fn ensure_not_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn ensure_minimum_stock(value: i64) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::validation("minimum_stock cannot be negative"));
    }
    Ok(())
}

impl Part {
    /// Create a new part with zero stock.
    pub fn create(id: PartId, draft: PartDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        ensure_not_blank("code", &draft.code)?;
        ensure_not_blank("name", &draft.name)?;
        ensure_minimum_stock(draft.minimum_stock)?;

        Ok(Self {
            id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            unit: draft.unit,
            minimum_stock: draft.minimum_stock,
            current_stock: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> PartId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn minimum_stock(&self) -> i64 {
        self.minimum_stock
    }

    pub fn current_stock(&self) -> i64 {
        self.current_stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn classification(&self) -> StockClassification {
        classify(self.current_stock, self.minimum_stock)
    }

    /// Strictly below the reorder threshold (dashboard low-stock rule).
    pub fn is_below_minimum(&self) -> bool {
        self.current_stock < self.minimum_stock
    }

    /// At or below the reorder threshold (low-stock report rule).
    pub fn is_at_or_below_minimum(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    /// Stock level after applying `movement`, without mutating.
    ///
    /// Fails when the result does not fit in an `i64`.
    pub fn stock_after(&self, movement: &Movement) -> DomainResult<i64> {
        self.current_stock
            .checked_add(movement.signed_delta())
            .ok_or_else(|| DomainError::invariant("stock level overflow"))
    }

    /// Merge `patch` into the record and refresh `updated_at`.
    ///
    /// The whole patch is validated before any field changes. `updated_at` moves
    /// even when the patch is empty.
    pub fn apply_patch(&mut self, patch: PartPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(code) = &patch.code {
            ensure_not_blank("code", code)?;
        }
        if let Some(name) = &patch.name {
            ensure_not_blank("name", name)?;
        }
        if let Some(minimum) = patch.minimum_stock {
            ensure_minimum_stock(minimum)?;
        }

        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(minimum) = patch.minimum_stock {
            self.minimum_stock = minimum;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Apply a movement's signed quantity to the cached stock.
    ///
    /// Rejects movements recorded against another part.
    pub fn apply_movement(&mut self, movement: &Movement, now: DateTime<Utc>) -> DomainResult<()> {
        if movement.part_id() != self.id {
            return Err(DomainError::invariant("movement part_id does not match part"));
        }
        self.current_stock = self.stock_after(movement)?;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
