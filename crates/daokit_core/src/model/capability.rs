//! Entity capability contracts.
//!
//! # Responsibility
//! - Describe which lifecycle fields and alternate keys an entity carries.
//! - Let engine primitives demand capabilities through generic bounds instead
//!   of probing entities at runtime.
//!
//! # Invariants
//! - Every entity is `Clone + Normalize`, so a read result can always be
//!   copied and canonicalized before it leaves the engine.
//! - `id` is written by the engine exactly once, when the entity is added.
//! - `delete_time == None` means the entity is active.

use crate::model::credential::Credential;
use crate::model::owner::OwnerRef;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

/// Surrogate identifier assigned by the engine's id generator.
pub type EntityId = Uuid;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Self-normalizing capability.
///
/// The default implementation leaves the value untouched; entities override it
/// to trim, case-fold or otherwise canonicalize their payload.
pub trait Normalize {
    fn normalize(&mut self) {}
}

impl Normalize for String {}
impl Normalize for bool {}
impl Normalize for i64 {}
impl Normalize for Uuid {}

impl<T: Normalize> Normalize for Option<T> {
    fn normalize(&mut self) {
        if let Some(value) = self.as_mut() {
            value.normalize();
        }
    }
}

/// Lifecycle timestamps carried by every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Set once when the record is added.
    pub create_time: Option<Timestamp>,
    /// `None` until the first successful update.
    pub modify_time: Option<Timestamp>,
    /// Soft-delete tombstone. Only ever set for `SoftDelete` records.
    pub delete_time: Option<Timestamp>,
}

impl Timestamps {
    /// Returns whether the tombstone is set.
    pub fn is_deleted(&self) -> bool {
        self.delete_time.is_some()
    }
}

/// Root contract for anything the engine hands back to callers.
pub trait Entity: Clone + Debug + Normalize {
    /// Stable entity name used in logs and error messages.
    const ENTITY_NAME: &'static str;
}

/// Entity with a surrogate id and lifecycle timestamps.
pub trait Record: Entity {
    fn id(&self) -> Option<EntityId>;
    fn set_id(&mut self, id: EntityId);
    fn timestamps(&self) -> &Timestamps;
    fn timestamps_mut(&mut self) -> &mut Timestamps;
}

/// Marker for records that support the soft-delete lifecycle.
///
/// Delete, restore and purge primitives are only callable for these types.
pub trait SoftDelete: Record {
    fn is_deleted(&self) -> bool {
        self.timestamps().is_deleted()
    }
}

pub trait HasCode: Entity {
    fn code(&self) -> &str;
}

pub trait HasName: Entity {
    fn name(&self) -> &str;
}

/// Entity whose alternate keys are scoped by a parent entity.
pub trait HasParent: Entity {
    /// Field name reported when the parent reference is missing.
    const PARENT_ID_FIELD: &'static str;

    fn parent_id(&self) -> Option<EntityId>;
}

/// Entity whose name is unique per entity-type discriminator.
pub trait HasEntityType: Entity {
    fn entity_type(&self) -> &str;
}

pub trait HasOwner: Entity {
    fn owner(&self) -> &OwnerRef;
}

/// Entity carrying an optional, but unique when present, credential.
pub trait HasCredential: Record {
    fn credential(&self) -> Option<&Credential>;
}
