//! Attachment entity: owned by another entity's property.

use crate::model::capability::{
    Entity, EntityId, HasOwner, Normalize, Record, SoftDelete, Timestamps,
};
use crate::model::owner::OwnerRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Option<EntityId>,
    pub owner: OwnerRef,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Attachment {
    pub fn new(owner: OwnerRef, file_name: impl Into<String>, size_bytes: i64) -> Self {
        Self {
            id: None,
            owner,
            file_name: file_name.into(),
            content_type: "application/octet-stream".to_string(),
            size_bytes,
            timestamps: Timestamps::default(),
        }
    }
}

impl Normalize for Attachment {
    fn normalize(&mut self) {
        self.file_name = self.file_name.trim().to_string();
        self.content_type = self.content_type.trim().to_ascii_lowercase();
    }
}

impl Entity for Attachment {
    const ENTITY_NAME: &'static str = "attachment";
}

impl Record for Attachment {
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

impl SoftDelete for Attachment {}

impl HasOwner for Attachment {
    fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}
