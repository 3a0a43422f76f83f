//! Storage mapper contracts consumed by the DAO mixins.
//!
//! # Responsibility
//! - Describe the row-level operations a storage binding must provide.
//! - Keep query construction out of the engine: mappers receive an
//!   `EntityKey` whose part names are storage field names.
//!
//! # Invariants
//! - Write methods return affected row counts; the engine decides what zero
//!   means.
//! - Lifecycle preconditions are enforced by the mapper: `delete_by_key`
//!   only touches active rows, `restore_by_key` and `purge_by_key` only
//!   touch deleted rows, `erase_by_key` ignores the tombstone.

use crate::dao::error::DaoResult;
use crate::model::capability::{EntityId, Record, SoftDelete, Timestamp};
use crate::model::key::{EntityKey, KeyValue};

/// Which lifecycle states a read or keyed write may match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// `delete_time IS NULL`.
    #[default]
    Active,
    /// `delete_time IS NOT NULL`.
    Deleted,
    All,
}

/// Root mapper contract for every record type.
pub trait Mapper<E: Record> {
    fn insert(&self, entity: &E) -> DaoResult<usize>;

    /// Rewrites the mutable columns of the rows matching `key`. Neither `id`
    /// nor `create_time` is touched.
    fn update_by_key(&self, key: &EntityKey, visibility: Visibility, entity: &E)
        -> DaoResult<usize>;

    /// Writes one column plus `modify_time` on the active rows matching `key`.
    fn update_property_by_key(
        &self,
        key: &EntityKey,
        property: &'static str,
        value: &KeyValue,
        modify_time: Timestamp,
    ) -> DaoResult<usize>;

    fn select_by_key(&self, key: &EntityKey, visibility: Visibility) -> DaoResult<Option<E>>;

    fn select_id_by_key(
        &self,
        key: &EntityKey,
        visibility: Visibility,
    ) -> DaoResult<Option<EntityId>>;

    /// Lists matching rows; `None` matches every row.
    fn select_list(&self, key: Option<&EntityKey>, visibility: Visibility) -> DaoResult<Vec<E>>;

    fn count(&self, key: Option<&EntityKey>, visibility: Visibility) -> DaoResult<usize>;

    fn erase_by_key(&self, key: &EntityKey) -> DaoResult<usize>;

    /// Updates the active row carrying the entity's id.
    fn update(&self, entity: &E) -> DaoResult<usize> {
        match entity.id() {
            Some(id) => self.update_by_key(&EntityKey::id(id), Visibility::Active, entity),
            None => Ok(0),
        }
    }

    fn exists_by_key(&self, key: &EntityKey, visibility: Visibility) -> DaoResult<bool> {
        Ok(self.count(Some(key), visibility)? > 0)
    }
}

/// Lifecycle writes for soft-deletable records.
pub trait SoftDeleteMapper<E: SoftDelete>: Mapper<E> {
    /// Stamps `delete_time` on matching active rows.
    fn delete_by_key(&self, key: &EntityKey, delete_time: Timestamp) -> DaoResult<usize>;

    /// Clears `delete_time` and stamps `modify_time` on matching deleted rows.
    fn restore_by_key(&self, key: &EntityKey, modify_time: Timestamp) -> DaoResult<usize>;

    /// Removes matching deleted rows.
    fn purge_by_key(&self, key: &EntityKey) -> DaoResult<usize>;

    /// Removes every deleted row.
    fn purge_all(&self) -> DaoResult<usize>;
}
