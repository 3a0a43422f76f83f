//! DAO root contract and capability mixins.
//!
//! # Responsibility
//! - `Dao` wires one mapper to the engine and provides the id-keyed surface.
//! - Each mixin adds the operations of one capability (code, name,
//!   parent-scoped keys, entity type, credential, owner, soft delete) as
//!   default methods. Implementors write `impl CodeDao for MyDao {}`.
//!
//! # Invariants
//! - Every method delegates to exactly one engine primitive and hands it a
//!   closure over the mapper; no mixin bypasses the engine.
//! - Plain getters see active rows only. Upsert existence checks and
//!   alternate-key updates match every lifecycle state, the same scope as
//!   the storage uniqueness constraints.

use crate::dao::error::DaoResult;
use crate::dao::helper::DaoHelper;
use crate::dao::mapper::{Mapper, SoftDeleteMapper, Visibility};
use crate::dao::owner::owner_key;
use crate::dao::upsert::{
    code_key, credential_key, entity_type_name_key, name_key, parent_code_key, parent_name_key,
};
use crate::model::capability::{
    EntityId, HasCode, HasCredential, HasEntityType, HasName, HasOwner, HasParent, Normalize,
    Record, SoftDelete, Timestamp,
};
use crate::model::credential::Credential;
use crate::model::key::{EntityKey, KeyValue};
use crate::model::owner::OwnerRef;
use std::fmt::Debug;

/// Root DAO contract.
pub trait Dao {
    type Entity: Record;
    type Mapper: Mapper<Self::Entity>;

    fn helper(&self) -> &DaoHelper;
    fn mapper(&self) -> &Self::Mapper;

    /// Active entity by id.
    fn get(&self, id: EntityId) -> DaoResult<Self::Entity> {
        self.get_by_key(&EntityKey::id(id), Visibility::Active)
    }

    fn get_or_none(&self, id: EntityId) -> DaoResult<Option<Self::Entity>> {
        self.get_by_key_or_none(&EntityKey::id(id), Visibility::Active)
    }

    /// Entity by id whatever its lifecycle state.
    fn get_including_deleted(&self, id: EntityId) -> DaoResult<Self::Entity> {
        self.get_by_key(&EntityKey::id(id), Visibility::All)
    }

    fn exists(&self, id: EntityId) -> DaoResult<bool> {
        self.exists_by_key(&EntityKey::id(id), Visibility::Active)
    }

    fn get_all(&self) -> DaoResult<Vec<Self::Entity>> {
        self.helper()
            .get_list::<Self::Entity, Self::Entity, _>("active", || {
                self.mapper().select_list(None, Visibility::Active)
            })
    }

    fn count(&self) -> DaoResult<usize> {
        self.helper().count_by::<Self::Entity, _>("active", || {
            self.mapper().count(None, Visibility::Active)
        })
    }

    fn add(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.helper().add(entity, |entity| self.mapper().insert(entity))
    }

    fn batch_add(&self, entities: &mut [Self::Entity]) -> DaoResult<Timestamp> {
        self.helper()
            .batch_add(entities, |entity| self.mapper().insert(entity))
    }

    fn update(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.helper()
            .update(entity, |entity| self.mapper().update(entity))
    }

    /// Removes the entity whatever its lifecycle state.
    fn erase(&self, id: EntityId) -> DaoResult<()> {
        let key = EntityKey::id(id);
        self.helper()
            .erase::<Self::Entity, _>(&key, || self.mapper().erase_by_key(&key))
    }

    fn get_by_key(&self, key: &EntityKey, visibility: Visibility) -> DaoResult<Self::Entity> {
        self.helper()
            .get_by_key::<Self::Entity, Self::Entity, _>(key, || {
                self.mapper().select_by_key(key, visibility)
            })
    }

    fn get_by_key_or_none(
        &self,
        key: &EntityKey,
        visibility: Visibility,
    ) -> DaoResult<Option<Self::Entity>> {
        self.helper()
            .get_by_key_or_none::<Self::Entity, Self::Entity, _>(key, || {
                self.mapper().select_by_key(key, visibility)
            })
    }

    fn exists_by_key(&self, key: &EntityKey, visibility: Visibility) -> DaoResult<bool> {
        self.helper().exist_by_key::<Self::Entity, _>(key, || {
            self.mapper().exists_by_key(key, visibility)
        })
    }

    /// Full update of the entity holding `key`, whatever its lifecycle state.
    fn update_by_key(&self, key: &EntityKey, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.helper().update_by_key(key, entity, |entity| {
            self.mapper().update_by_key(key, Visibility::All, entity)
        })
    }

    /// Writes one property of the active entity holding `key`. The value is
    /// normalized first.
    fn update_property<V>(
        &self,
        key: &EntityKey,
        property: &'static str,
        value: V,
    ) -> DaoResult<Timestamp>
    where
        V: Normalize + Debug + Clone + Into<KeyValue>,
    {
        let mut value = value;
        self.helper().update_property_by_key::<Self::Entity, V, _>(
            key,
            property,
            &mut value,
            |value, now| {
                let value: KeyValue = value.clone().into();
                self.mapper()
                    .update_property_by_key(key, property, &value, now)
            },
        )
    }

    /// Upsert on the alternate key produced by `resolve`.
    fn add_or_update_by<K>(&self, entity: &mut Self::Entity, resolve: K) -> DaoResult<Timestamp>
    where
        K: FnOnce(&Self::Entity) -> DaoResult<EntityKey>,
    {
        let mapper = self.mapper();
        self.helper().add_or_update(
            entity,
            resolve,
            |key| mapper.exists_by_key(key, Visibility::All),
            |entity| mapper.insert(entity),
            |key, entity| mapper.update_by_key(key, Visibility::All, entity),
        )
    }
}

/// Soft-delete lifecycle by id.
pub trait SoftDeleteDao: Dao
where
    Self::Entity: SoftDelete,
    Self::Mapper: SoftDeleteMapper<Self::Entity>,
{
    fn delete(&self, id: EntityId) -> DaoResult<Timestamp> {
        let key = EntityKey::id(id);
        self.helper()
            .delete::<Self::Entity, _>(&key, |now| self.mapper().delete_by_key(&key, now))
    }

    fn restore(&self, id: EntityId) -> DaoResult<Timestamp> {
        let key = EntityKey::id(id);
        self.helper()
            .restore::<Self::Entity, _>(&key, |now| self.mapper().restore_by_key(&key, now))
    }

    fn purge(&self, id: EntityId) -> DaoResult<()> {
        let key = EntityKey::id(id);
        self.helper()
            .purge::<Self::Entity, _>(&key, || self.mapper().purge_by_key(&key))
    }

    fn purge_all(&self) -> DaoResult<usize> {
        self.helper()
            .purge_all::<Self::Entity, _>(|| self.mapper().purge_all())
    }

    fn exist_non_deleted(&self, id: EntityId) -> DaoResult<bool> {
        let key = EntityKey::id(id);
        self.helper().exist_non_deleted::<Self::Entity, _>(&key, || {
            self.mapper().exists_by_key(&key, Visibility::Active)
        })
    }

    /// Soft-deleted entity by id.
    fn get_deleted(&self, id: EntityId) -> DaoResult<Self::Entity> {
        self.get_by_key(&EntityKey::id(id), Visibility::Deleted)
    }

    fn get_all_deleted(&self) -> DaoResult<Vec<Self::Entity>> {
        self.helper()
            .get_list::<Self::Entity, Self::Entity, _>("deleted", || {
                self.mapper().select_list(None, Visibility::Deleted)
            })
    }
}

/// Globally unique `code`.
pub trait CodeDao: Dao
where
    Self::Entity: HasCode,
{
    fn get_by_code(&self, code: &str) -> DaoResult<Self::Entity> {
        self.get_by_key(&EntityKey::new("code", code), Visibility::Active)
    }

    fn get_by_code_or_none(&self, code: &str) -> DaoResult<Option<Self::Entity>> {
        self.get_by_key_or_none(&EntityKey::new("code", code), Visibility::Active)
    }

    fn exists_by_code(&self, code: &str) -> DaoResult<bool> {
        self.exists_by_key(&EntityKey::new("code", code), Visibility::Active)
    }

    fn update_by_code(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        entity.normalize();
        let key = code_key(&*entity);
        self.update_by_key(&key, entity)
    }

    fn add_or_update_by_code(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.add_or_update_by(entity, |entity| Ok(code_key(entity)))
    }

    fn delete_by_code(&self, code: &str) -> DaoResult<Timestamp>
    where
        Self::Entity: SoftDelete,
        Self::Mapper: SoftDeleteMapper<Self::Entity>,
    {
        let key = EntityKey::new("code", code);
        self.helper()
            .delete::<Self::Entity, _>(&key, |now| self.mapper().delete_by_key(&key, now))
    }
}

/// Globally unique `name`.
pub trait NameDao: Dao
where
    Self::Entity: HasName,
{
    fn get_by_name(&self, name: &str) -> DaoResult<Self::Entity> {
        self.get_by_key(&EntityKey::new("name", name), Visibility::Active)
    }

    fn get_by_name_or_none(&self, name: &str) -> DaoResult<Option<Self::Entity>> {
        self.get_by_key_or_none(&EntityKey::new("name", name), Visibility::Active)
    }

    fn exists_by_name(&self, name: &str) -> DaoResult<bool> {
        self.exists_by_key(&EntityKey::new("name", name), Visibility::Active)
    }

    fn update_by_name(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        entity.normalize();
        let key = name_key(&*entity);
        self.update_by_key(&key, entity)
    }

    fn add_or_update_by_name(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.add_or_update_by(entity, |entity| Ok(name_key(entity)))
    }
}

/// `code` unique within the parent.
pub trait ParentCodeDao: Dao
where
    Self::Entity: HasCode + HasParent,
{
    fn get_by_parent_code(&self, parent_id: EntityId, code: &str) -> DaoResult<Self::Entity> {
        let key = EntityKey::new("code", code).with(Self::Entity::PARENT_ID_FIELD, parent_id);
        self.get_by_key(&key, Visibility::Active)
    }

    fn exists_by_parent_code(&self, parent_id: EntityId, code: &str) -> DaoResult<bool> {
        let key = EntityKey::new("code", code).with(Self::Entity::PARENT_ID_FIELD, parent_id);
        self.exists_by_key(&key, Visibility::Active)
    }

    /// Fails with `MissingRequiredField` before touching storage when the
    /// parent reference is unset.
    fn add_or_update_by_parent_code(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.add_or_update_by(entity, |entity| parent_code_key(entity))
    }
}

/// `name` unique within the parent.
pub trait ParentNameDao: Dao
where
    Self::Entity: HasName + HasParent,
{
    fn get_by_parent_name(&self, parent_id: EntityId, name: &str) -> DaoResult<Self::Entity> {
        let key = EntityKey::new("name", name).with(Self::Entity::PARENT_ID_FIELD, parent_id);
        self.get_by_key(&key, Visibility::Active)
    }

    fn exists_by_parent_name(&self, parent_id: EntityId, name: &str) -> DaoResult<bool> {
        let key = EntityKey::new("name", name).with(Self::Entity::PARENT_ID_FIELD, parent_id);
        self.exists_by_key(&key, Visibility::Active)
    }

    fn add_or_update_by_parent_name(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.add_or_update_by(entity, |entity| parent_name_key(entity))
    }
}

/// `name` unique per entity-type discriminator.
pub trait EntityTypeNameDao: Dao
where
    Self::Entity: HasEntityType + HasName,
{
    fn get_by_entity_type_name(&self, entity_type: &str, name: &str) -> DaoResult<Self::Entity> {
        let key = EntityKey::new("name", name).with("entity_type", entity_type);
        self.get_by_key(&key, Visibility::Active)
    }

    fn exists_by_entity_type_name(&self, entity_type: &str, name: &str) -> DaoResult<bool> {
        let key = EntityKey::new("name", name).with("entity_type", entity_type);
        self.exists_by_key(&key, Visibility::Active)
    }

    fn get_all_by_entity_type(&self, entity_type: &str) -> DaoResult<Vec<Self::Entity>> {
        let key = EntityKey::new("entity_type", entity_type);
        self.helper()
            .get_list::<Self::Entity, Self::Entity, _>(entity_type, || {
                self.mapper().select_list(Some(&key), Visibility::Active)
            })
    }

    fn add_or_update_by_entity_type_name(
        &self,
        entity: &mut Self::Entity,
    ) -> DaoResult<Timestamp> {
        self.add_or_update_by(entity, |entity| Ok(entity_type_name_key(entity)))
    }
}

/// Optional credential, unique when present.
pub trait CredentialDao: Dao
where
    Self::Entity: HasCredential,
{
    /// Adds after checking that no stored entity holds the credential.
    fn add_checked(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.helper().check_duplicate_before_add(&*entity, |credential| {
            self.mapper()
                .exists_by_key(&EntityKey::new("credential", credential), Visibility::All)
        })?;
        self.add(entity)
    }

    /// Updates after checking that no other entity holds the credential.
    fn update_checked(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.helper().check_duplicate_before_update(&*entity, |credential| {
            self.mapper()
                .select_id_by_key(&EntityKey::new("credential", credential), Visibility::All)
        })?;
        self.update(entity)
    }

    fn get_by_credential(&self, credential: &Credential) -> DaoResult<Self::Entity> {
        let mut credential = credential.clone();
        credential.normalize();
        self.get_by_key(&EntityKey::new("credential", &credential), Visibility::Active)
    }

    /// Fails with `MissingRequiredField` when the entity has no credential.
    fn add_or_update_by_credential(&self, entity: &mut Self::Entity) -> DaoResult<Timestamp> {
        self.add_or_update_by(entity, |entity| credential_key(entity))
    }
}

/// Bulk operations scoped to an owner entity and property.
pub trait OwnerDao: Dao
where
    Self::Entity: HasOwner,
{
    fn count_for_owner(&self, owner: &OwnerRef) -> DaoResult<usize> {
        let key = owner_key(owner);
        self.helper().count_for_owner::<Self::Entity, _>(owner, || {
            self.mapper().count(Some(&key), Visibility::Active)
        })
    }

    fn get_for_owner(&self, owner: &OwnerRef) -> DaoResult<Vec<Self::Entity>> {
        let key = owner_key(owner);
        self.helper()
            .list_for_owner::<Self::Entity, Self::Entity, _>(owner, || {
                self.mapper().select_list(Some(&key), Visibility::Active)
            })
    }

    fn erase_for_owner(&self, owner: &OwnerRef) -> DaoResult<usize> {
        let key = owner_key(owner);
        self.helper()
            .erase_for_owner::<Self::Entity, _>(owner, || self.mapper().erase_by_key(&key))
    }

    fn delete_for_owner(&self, owner: &OwnerRef) -> DaoResult<usize>
    where
        Self::Entity: SoftDelete,
        Self::Mapper: SoftDeleteMapper<Self::Entity>,
    {
        let key = owner_key(owner);
        self.helper()
            .delete_for_owner::<Self::Entity, _>(owner, |now| {
                self.mapper().delete_by_key(&key, now)
            })
    }

    fn restore_for_owner(&self, owner: &OwnerRef) -> DaoResult<usize>
    where
        Self::Entity: SoftDelete,
        Self::Mapper: SoftDeleteMapper<Self::Entity>,
    {
        let key = owner_key(owner);
        self.helper()
            .restore_for_owner::<Self::Entity, _>(owner, |now| {
                self.mapper().restore_by_key(&key, now)
            })
    }

    fn purge_for_owner(&self, owner: &OwnerRef) -> DaoResult<usize>
    where
        Self::Entity: SoftDelete,
        Self::Mapper: SoftDeleteMapper<Self::Entity>,
    {
        let key = owner_key(owner);
        self.helper()
            .purge_for_owner::<Self::Entity, _>(owner, || self.mapper().purge_by_key(&key))
    }
}
