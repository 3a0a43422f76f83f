//! Owner references used to scope bulk operations.

use crate::model::capability::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Reference to the owning entity and the property that holds the relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    /// Owning entity name, e.g. `member`.
    pub entity_type: String,
    /// Owning property, e.g. `avatar`.
    pub property: String,
    pub owner_id: EntityId,
}

impl OwnerRef {
    pub fn new(
        entity_type: impl Into<String>,
        property: impl Into<String>,
        owner_id: EntityId,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            property: property.into(),
            owner_id,
        }
    }
}

impl Display for OwnerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "owner_type={},owner_property={},owner_id={}",
            self.entity_type, self.property, self.owner_id
        )
    }
}
