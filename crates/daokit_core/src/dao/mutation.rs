//! Mutation primitives: add, batch add, update, keyed update, property update.
//!
//! # Invariants
//! - `add` assigns a fresh id, stamps `create_time`, clears `modify_time`
//!   and `delete_time`, and normalizes before the insert is dispatched.
//! - `batch_add` shares one `create_time` across the batch and inserts in
//!   order, stopping at the first failure. Rollback belongs to the ambient
//!   transaction.
//! - Zero affected rows: `UpdateFailed` for inserts, `NotFound` for updates.

use crate::dao::error::{DaoError, DaoResult};
use crate::dao::helper::{DaoHelper, OpTrace};
use crate::model::capability::{Entity, EntityId, Normalize, Record, Timestamp};
use crate::model::key::EntityKey;
use std::fmt::Debug;

impl DaoHelper {
    /// Prepares and inserts a new entity. Returns its `create_time`.
    pub fn add<E, F>(&self, entity: &mut E, insert: F) -> DaoResult<Timestamp>
    where
        E: Record,
        F: FnOnce(&E) -> DaoResult<usize>,
    {
        let now = self.now();
        let id = self.prepare_insert(entity, now);
        self.dispatch_insert("dao_add", id, entity, insert)?;
        Ok(now)
    }

    /// Adds every entity in order with one shared `create_time`.
    pub fn batch_add<E, F>(&self, entities: &mut [E], mut insert: F) -> DaoResult<Timestamp>
    where
        E: Record,
        F: FnMut(&E) -> DaoResult<usize>,
    {
        let now = self.now();
        let batch = format!("batch_size={}", entities.len());
        let trace = OpTrace::start("dao_batch_add", E::ENTITY_NAME, &batch);
        for entity in entities.iter_mut() {
            let id = self.prepare_insert(entity, now);
            trace.check(self.dispatch_insert("dao_add", id, entity, &mut insert))?;
        }
        trace.ok(format_args!("create_time={now}"));
        Ok(now)
    }

    /// Updates an entity matched by its surrogate id.
    ///
    /// # Errors
    /// - `MissingRequiredField` when the entity was never assigned an id.
    /// - `NotFound` when the update touched no rows.
    pub fn update<E, F>(&self, entity: &mut E, update: F) -> DaoResult<Timestamp>
    where
        E: Record,
        F: FnOnce(&E) -> DaoResult<usize>,
    {
        let id = entity.id().ok_or(DaoError::MissingRequiredField {
            entity: E::ENTITY_NAME,
            field: "id",
        })?;
        self.apply_update("dao_update", &EntityKey::id(id), entity, update)
    }

    /// Updates an entity matched by a caller-supplied key.
    ///
    /// The updater receives the entity with `modify_time` already stamped.
    pub fn update_by_key<E, F>(
        &self,
        key: &EntityKey,
        entity: &mut E,
        updater: F,
    ) -> DaoResult<Timestamp>
    where
        E: Record,
        F: FnOnce(&E) -> DaoResult<usize>,
    {
        self.apply_update("dao_update_by_key", key, entity, updater)
    }

    /// Writes exactly one property of the entity matched by `key`.
    ///
    /// The value is normalized before the updater sees it; the updater also
    /// receives the new `modify_time`.
    pub fn update_property_by_key<E, V, F>(
        &self,
        key: &EntityKey,
        property: &'static str,
        value: &mut V,
        updater: F,
    ) -> DaoResult<Timestamp>
    where
        E: Entity,
        V: Normalize + Debug,
        F: FnOnce(&V, Timestamp) -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_update_property", E::ENTITY_NAME, key);
        value.normalize();
        let now = self.now();
        let affected = trace.check(updater(&*value, now))?;
        trace.expect_rows(affected)?;
        trace.ok(format_args!("property={property} modify_time={now}"));
        Ok(now)
    }

    fn prepare_insert<E: Record>(&self, entity: &mut E, now: Timestamp) -> EntityId {
        let id = self.next_id();
        entity.set_id(id);
        let timestamps = entity.timestamps_mut();
        timestamps.create_time = Some(now);
        timestamps.modify_time = None;
        timestamps.delete_time = None;
        entity.normalize();
        id
    }

    fn dispatch_insert<E, F>(
        &self,
        event: &'static str,
        id: EntityId,
        entity: &E,
        insert: F,
    ) -> DaoResult<()>
    where
        E: Record,
        F: FnOnce(&E) -> DaoResult<usize>,
    {
        let key = EntityKey::id(id);
        let trace = OpTrace::start(event, E::ENTITY_NAME, &key);
        let affected = trace.check(insert(entity))?;
        if affected == 0 {
            return trace.check(Err(DaoError::UpdateFailed {
                entity: E::ENTITY_NAME,
                key: key.to_string(),
            }));
        }
        trace.ok(format_args!(
            "create_time={}",
            entity.timestamps().create_time.unwrap_or_default()
        ));
        Ok(())
    }

    fn apply_update<E, F>(
        &self,
        event: &'static str,
        key: &EntityKey,
        entity: &mut E,
        updater: F,
    ) -> DaoResult<Timestamp>
    where
        E: Record,
        F: FnOnce(&E) -> DaoResult<usize>,
    {
        let trace = OpTrace::start(event, E::ENTITY_NAME, key);
        entity.normalize();
        let now = self.now();
        entity.timestamps_mut().modify_time = Some(now);
        let affected = trace.check(updater(&*entity))?;
        trace.expect_rows(affected)?;
        trace.ok(format_args!("modify_time={now}"));
        Ok(now)
    }
}
