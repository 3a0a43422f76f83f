//! Organization entity.
//!
//! # Invariants
//! - `code` and `name` are globally unique alternate keys.
//! - Normalized `code` is trimmed uppercase; `name` is trimmed.

use crate::model::capability::{
    Entity, EntityId, HasCode, HasName, Normalize, Record, SoftDelete, Timestamps,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Option<EntityId>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Organization {
    /// Creates an unsaved organization. The id is assigned on add.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            description: None,
            timestamps: Timestamps::default(),
        }
    }
}

impl Normalize for Organization {
    fn normalize(&mut self) {
        self.code = self.code.trim().to_uppercase();
        self.name = self.name.trim().to_string();
        self.description = self
            .description
            .take()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
    }
}

impl Entity for Organization {
    const ENTITY_NAME: &'static str = "organization";
}

impl Record for Organization {
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

impl SoftDelete for Organization {}

impl HasCode for Organization {
    fn code(&self) -> &str {
        &self.code
    }
}

impl HasName for Organization {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::Organization;
    use crate::model::capability::Normalize;

    #[test]
    fn normalize_canonicalizes_code_and_drops_blank_description() {
        let mut org = Organization::new("  acme-eu ", " Acme Europe ");
        org.description = Some("   ".to_string());
        org.normalize();
        assert_eq!(org.code, "ACME-EU");
        assert_eq!(org.name, "Acme Europe");
        assert!(org.description.is_none());
    }

    #[test]
    fn serializes_timestamps_inline() {
        let org = Organization::new("ACME", "Acme");
        let json = serde_json::to_value(&org).expect("serialize organization");
        assert!(json.get("create_time").is_some());
        assert!(json.get("timestamps").is_none());
    }
}
