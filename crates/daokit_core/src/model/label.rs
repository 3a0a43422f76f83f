//! Label entity: names unique per entity-type discriminator.
//!
//! Labels have no soft-delete lifecycle; they can only be erased.

use crate::model::capability::{
    Entity, EntityId, HasEntityType, HasName, Normalize, Record, Timestamps,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: Option<EntityId>,
    /// Entity type the label applies to, e.g. `member`.
    pub entity_type: String,
    pub name: String,
    /// `#rrggbb` color code.
    pub color: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Label {
    pub fn new(entity_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            entity_type: entity_type.into(),
            name: name.into(),
            color: None,
            timestamps: Timestamps::default(),
        }
    }
}

impl Normalize for Label {
    fn normalize(&mut self) {
        self.entity_type = self.entity_type.trim().to_ascii_lowercase();
        self.name = self.name.trim().to_string();
        self.color = self
            .color
            .take()
            .map(|color| color.trim().to_ascii_lowercase());
    }
}

impl Entity for Label {
    const ENTITY_NAME: &'static str = "label";
}

impl Record for Label {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}

impl HasName for Label {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasEntityType for Label {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }
}
