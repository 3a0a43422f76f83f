//! Member entity.
//!
//! # Invariants
//! - `code` and `name` are unique within the parent organization.
//! - `credential` is optional and unique when present.
//! - `organization_id` is mandatory for parent-scoped upserts.

use crate::model::capability::{
    Entity, EntityId, HasCode, HasCredential, HasName, HasParent, Normalize, Record, SoftDelete,
    Timestamps,
};
use crate::model::credential::Credential;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<EntityId>,
    pub organization_id: Option<EntityId>,
    pub code: String,
    pub name: String,
    pub credential: Option<Credential>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Member {
    pub fn new(
        organization_id: Option<EntityId>,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            organization_id,
            code: code.into(),
            name: name.into(),
            credential: None,
            email: None,
            timestamps: Timestamps::default(),
        }
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }
}

impl Normalize for Member {
    fn normalize(&mut self) {
        self.code = self.code.trim().to_uppercase();
        self.name = self.name.trim().to_string();
        self.credential.normalize();
        self.email = self
            .email
            .take()
            .map(|email| email.trim().to_ascii_lowercase())
            .filter(|email| !email.is_empty());
    }
}

impl Entity for Member {
    const ENTITY_NAME: &'static str = "member";
}

impl Record for Member {
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

impl SoftDelete for Member {}

impl HasCode for Member {
    fn code(&self) -> &str {
        &self.code
    }
}

impl HasName for Member {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasParent for Member {
    const PARENT_ID_FIELD: &'static str = "organization_id";

    fn parent_id(&self) -> Option<EntityId> {
        self.organization_id
    }
}

impl HasCredential for Member {
    fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}
