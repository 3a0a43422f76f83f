//! Surrogate id generation.

use crate::model::capability::EntityId;
use uuid::Uuid;

/// Source of surrogate ids. Called exactly once per added entity.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> EntityId;
}

/// Random (v4) UUID generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> EntityId {
        Uuid::new_v4()
    }
}
