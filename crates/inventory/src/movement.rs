use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, MovementId, PartId, ValueObject};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Entry,
    Exit,
}

impl MovementType {
    /// +1 for entries, -1 for exits.
    pub fn sign(&self) -> i64 {
        match self {
            MovementType::Entry => 1,
            MovementType::Exit => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
        }
    }
}

/// Strictly positive movement quantity.
///
/// Zero is not a valid "no-op" movement. Deserialization runs the same check,
/// so a persisted blob cannot smuggle in a non-positive quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be positive (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// Input for recording a movement (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDraft {
    pub part_id: PartId,
    #[serde(rename = "type")]
    pub kind: MovementType,
    /// Raw quantity; validated when the movement is recorded.
    pub quantity: i64,
    /// Business date of the movement, may differ from recording time.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_by: String,
}

/// One stock change event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    id: MovementId,
    part_id: PartId,
    #[serde(rename = "type")]
    kind: MovementType,
    quantity: Quantity,
    date: DateTime<Utc>,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    created_by: String,
}

impl Movement {
    /// Validate a draft and assign it an id.
    ///
    /// Only checks what the movement can check on its own (positive quantity);
    /// the part's existence is the ledger's concern.
    pub fn record(id: MovementId, draft: MovementDraft) -> DomainResult<Self> {
        let quantity = Quantity::new(draft.quantity)?;
        Ok(Self {
            id,
            part_id: draft.part_id,
            kind: draft.kind,
            quantity,
            date: draft.date,
            notes: draft.notes,
            created_by: draft.created_by,
        })
    }

    pub fn id_typed(&self) -> MovementId {
        self.id
    }

    pub fn part_id(&self) -> PartId {
        self.part_id
    }

    pub fn kind(&self) -> MovementType {
        self.kind
    }

    pub fn quantity(&self) -> i64 {
        self.quantity.get()
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// +quantity for entries, -quantity for exits.
    pub fn signed_delta(&self) -> i64 {
        self.kind.sign() * self.quantity.get()
    }
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
