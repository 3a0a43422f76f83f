//! Upsert by alternate key.
//!
//! # Responsibility
//! - Derive the alternate key from the entity (code, name, parent-scoped
//!   code/name, entity type + name, credential).
//! - Route to `add` when the key is free and to `update_by_key` otherwise.
//!
//! # Invariants
//! - Key derivation happens before any storage call; a parent-scoped key
//!   without a parent fails with `MissingRequiredField` and touches nothing.
//! - The check-then-write window is not serialized here. A storage
//!   `DuplicateKey` raised by a concurrent writer propagates unchanged.

use crate::dao::error::{DaoError, DaoResult};
use crate::dao::helper::{DaoHelper, OpTrace};
use crate::model::capability::{
    EntityId, HasCode, HasCredential, HasEntityType, HasName, HasParent, Record, Timestamp,
};
use crate::model::key::EntityKey;

pub fn code_key<E: HasCode>(entity: &E) -> EntityKey {
    EntityKey::new("code", entity.code())
}

pub fn name_key<E: HasName>(entity: &E) -> EntityKey {
    EntityKey::new("name", entity.name())
}

/// `code` scoped by the parent id.
///
/// # Errors
/// - `MissingRequiredField` naming `E::PARENT_ID_FIELD` when the parent is unset.
pub fn parent_code_key<E: HasCode + HasParent>(entity: &E) -> DaoResult<EntityKey> {
    let parent_id = require_parent(entity)?;
    Ok(EntityKey::new("code", entity.code()).with(E::PARENT_ID_FIELD, parent_id))
}

/// `name` scoped by the parent id.
pub fn parent_name_key<E: HasName + HasParent>(entity: &E) -> DaoResult<EntityKey> {
    let parent_id = require_parent(entity)?;
    Ok(EntityKey::new("name", entity.name()).with(E::PARENT_ID_FIELD, parent_id))
}

pub fn entity_type_name_key<E: HasEntityType + HasName>(entity: &E) -> EntityKey {
    EntityKey::new("name", entity.name()).with("entity_type", entity.entity_type())
}

/// Key on the encoded credential.
///
/// # Errors
/// - `MissingRequiredField` when the entity carries no credential.
/// - `Model` when the credential number is malformed.
pub fn credential_key<E: HasCredential>(entity: &E) -> DaoResult<EntityKey> {
    let credential = entity
        .credential()
        .ok_or(DaoError::MissingRequiredField {
            entity: E::ENTITY_NAME,
            field: "credential",
        })?;
    credential.validate()?;
    Ok(EntityKey::new("credential", credential))
}

fn require_parent<E: HasParent>(entity: &E) -> DaoResult<EntityId> {
    entity.parent_id().ok_or(DaoError::MissingRequiredField {
        entity: E::ENTITY_NAME,
        field: E::PARENT_ID_FIELD,
    })
}

impl DaoHelper {
    /// Adds `entity` when its alternate key is free, updates the holder of
    /// that key otherwise.
    ///
    /// `resolve` derives the key from the normalized entity and `tester`
    /// checks whether the key is taken. `insert` or `updater` then performs
    /// the write; the updater also receives the resolved key.
    pub fn add_or_update<E, K, T, A, U>(
        &self,
        entity: &mut E,
        resolve: K,
        tester: T,
        insert: A,
        updater: U,
    ) -> DaoResult<Timestamp>
    where
        E: Record,
        K: FnOnce(&E) -> DaoResult<EntityKey>,
        T: FnOnce(&EntityKey) -> DaoResult<bool>,
        A: FnOnce(&E) -> DaoResult<usize>,
        U: FnOnce(&EntityKey, &E) -> DaoResult<usize>,
    {
        entity.normalize();
        let key = match resolve(&*entity) {
            Ok(key) => key,
            Err(err) => {
                OpTrace::start("dao_add_or_update", E::ENTITY_NAME, &"unresolved").fail(&err);
                return Err(err);
            }
        };

        let trace = OpTrace::start("dao_add_or_update", E::ENTITY_NAME, &key);
        let exists = trace.check(self.exist_by_key::<E, _>(&key, || tester(&key)))?;
        let written = if exists {
            self.update_by_key(&key, entity, |entity| updater(&key, entity))
        } else {
            self.add(entity, insert)
        };
        let time = trace.check(written)?;
        trace.ok(format_args!(
            "branch={} time={time}",
            if exists { "update" } else { "add" }
        ));
        Ok(time)
    }
}

#[cfg(test)]
mod tests {
    use super::{code_key, parent_code_key};
    use crate::dao::error::DaoError;
    use crate::dao::helper::DaoHelper;
    use crate::model::member::Member;
    use std::cell::Cell;
    use uuid::Uuid;

    #[test]
    fn parent_scoped_key_requires_parent() {
        let member = Member::new(None, "m-1", "Ana");
        let err = parent_code_key(&member).expect_err("no parent");
        assert!(matches!(
            err,
            DaoError::MissingRequiredField {
                entity: "member",
                field: "organization_id"
            }
        ));
    }

    #[test]
    fn parent_code_key_lists_parent_after_code() {
        let parent = Uuid::new_v4();
        let member = Member::new(Some(parent), "M-1", "Ana");
        let key = parent_code_key(&member).expect("parent present");
        assert_eq!(key.to_string(), format!("code=M-1,organization_id={parent}"));
    }

    #[test]
    fn missing_parent_skips_existence_query_and_write() {
        let helper = DaoHelper::system();
        let tested = Cell::new(false);
        let written = Cell::new(false);
        let mut member = Member::new(None, "m-1", "Ana");

        let err = helper
            .add_or_update(
                &mut member,
                |member| parent_code_key(member),
                |_| {
                    tested.set(true);
                    Ok(false)
                },
                |_| {
                    written.set(true);
                    Ok(1)
                },
                |_, _| {
                    written.set(true);
                    Ok(1)
                },
            )
            .expect_err("parent is mandatory");

        assert!(matches!(err, DaoError::MissingRequiredField { .. }));
        assert!(!tested.get());
        assert!(!written.get());
    }

    #[test]
    fn existing_key_routes_to_update() {
        let helper = DaoHelper::system();
        let branch = Cell::new("none");
        let mut member = Member::new(Some(Uuid::new_v4()), " m-1 ", "Ana");

        helper
            .add_or_update(
                &mut member,
                |member| Ok(code_key(member)),
                |key| {
                    assert_eq!(key.to_string(), "code=M-1");
                    Ok(true)
                },
                |_| {
                    branch.set("add");
                    Ok(1)
                },
                |key, _| {
                    assert_eq!(key.name(), "code");
                    branch.set("update");
                    Ok(1)
                },
            )
            .expect("upsert");

        assert_eq!(branch.get(), "update");
        assert!(member.id.is_none());
        assert!(member.timestamps.modify_time.is_some());
    }

    #[test]
    fn storage_duplicate_on_insert_propagates() {
        let helper = DaoHelper::system();
        let mut member = Member::new(Some(Uuid::new_v4()), "M-1", "Ana");

        let err = helper
            .add_or_update(
                &mut member,
                |member| Ok(code_key(member)),
                |_| Ok(false),
                |_| Err(DaoError::duplicate_key("members", "members.code")),
                |_, _| Ok(1),
            )
            .expect_err("concurrent writer took the key");

        assert!(matches!(err, DaoError::DuplicateKey { .. }));
    }
}

