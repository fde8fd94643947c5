use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, DomainError, DomainResult, Entity};

/// A named label for parts.
///
/// Parts copy the category *name* when it is assigned; there is no foreign key
/// back to this record, so renames and deletes never cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    /// Create a category; the name is trimmed and must not be empty.
    pub fn new(id: CategoryId, name: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
        })
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

const SEED_NAMES: [&str; 4] = ["Electronics", "Mechanical", "Electrical", "Hydraulic"];

/// Seed set used when no categories have been persisted yet.
///
/// Ids are fixed (`1..=4`) so reseeding yields the same records.
pub fn default_categories() -> Vec<Category> {
    SEED_NAMES
        .iter()
        .zip(1u128..)
        .map(|(name, n)| Category {
            id: CategoryId::from_u128(n),
            name: (*name).to_string(),
        })
        .collect()
}
