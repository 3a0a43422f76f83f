//! Owner-scoped bulk primitives.
//!
//! # Invariants
//! - Bulk operations report how many rows they touched; zero is a valid
//!   result and never maps to `NotFound`.
//! - Delete, restore and purge keep the lifecycle preconditions of their
//!   single-entity counterparts; the storage closure enforces them per row.

use crate::dao::error::DaoResult;
use crate::dao::helper::{DaoHelper, OpTrace};
use crate::dao::sanitize::sanitize_list;
use crate::model::capability::{HasOwner, Record, SoftDelete, Timestamp};
use crate::model::key::EntityKey;
use crate::model::owner::OwnerRef;
use std::borrow::Borrow;

/// Builds the composite key identifying every entity attached to `owner`.
pub fn owner_key(owner: &OwnerRef) -> EntityKey {
    EntityKey::new("owner_type", owner.entity_type.as_str())
        .with("owner_property", owner.property.as_str())
        .with("owner_id", owner.owner_id)
}

impl DaoHelper {
    pub fn count_for_owner<E, F>(&self, owner: &OwnerRef, counter: F) -> DaoResult<usize>
    where
        E: HasOwner,
        F: FnOnce() -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_count_for_owner", E::ENTITY_NAME, owner);
        let count = trace.check(counter())?;
        trace.ok(format_args!("count={count}"));
        Ok(count)
    }

    pub fn list_for_owner<E, R, F>(&self, owner: &OwnerRef, getter: F) -> DaoResult<Vec<E>>
    where
        E: HasOwner,
        R: Borrow<E>,
        F: FnOnce() -> DaoResult<Vec<R>>,
    {
        let trace = OpTrace::start("dao_list_for_owner", E::ENTITY_NAME, owner);
        let rows = trace.check(getter())?;
        let values = sanitize_list(Some(rows));
        trace.ok(format_args!("count={}", values.len()));
        Ok(values)
    }

    /// Soft-deletes every active entity of `owner`.
    pub fn delete_for_owner<E, F>(&self, owner: &OwnerRef, deleter: F) -> DaoResult<usize>
    where
        E: SoftDelete + HasOwner,
        F: FnOnce(Timestamp) -> DaoResult<usize>,
    {
        self.bulk_for_owner::<E, _>("dao_delete_for_owner", owner, deleter)
    }

    pub fn restore_for_owner<E, F>(&self, owner: &OwnerRef, restorer: F) -> DaoResult<usize>
    where
        E: SoftDelete + HasOwner,
        F: FnOnce(Timestamp) -> DaoResult<usize>,
    {
        self.bulk_for_owner::<E, _>("dao_restore_for_owner", owner, restorer)
    }

    pub fn purge_for_owner<E, F>(&self, owner: &OwnerRef, purger: F) -> DaoResult<usize>
    where
        E: SoftDelete + HasOwner,
        F: FnOnce() -> DaoResult<usize>,
    {
        self.bulk_for_owner::<E, _>("dao_purge_for_owner", owner, |_| purger())
    }

    /// Removes every entity of `owner` regardless of its tombstone.
    pub fn erase_for_owner<E, F>(&self, owner: &OwnerRef, eraser: F) -> DaoResult<usize>
    where
        E: Record + HasOwner,
        F: FnOnce() -> DaoResult<usize>,
    {
        self.bulk_for_owner::<E, _>("dao_erase_for_owner", owner, |_| eraser())
    }

    fn bulk_for_owner<E, F>(
        &self,
        event: &'static str,
        owner: &OwnerRef,
        action: F,
    ) -> DaoResult<usize>
    where
        E: Record + HasOwner,
        F: FnOnce(Timestamp) -> DaoResult<usize>,
    {
        let trace = OpTrace::start(event, E::ENTITY_NAME, owner);
        let now = self.now();
        let affected = trace.check(action(now))?;
        trace.ok(format_args!("affected={affected} time={now}"));
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::owner_key;
    use crate::dao::helper::DaoHelper;
    use crate::model::attachment::Attachment;
    use crate::model::owner::OwnerRef;
    use uuid::Uuid;

    #[test]
    fn owner_key_lists_all_three_parts() {
        let owner_id = Uuid::nil();
        let key = owner_key(&OwnerRef::new("member", "avatar", owner_id));
        assert_eq!(key.name(), "owner_type");
        assert_eq!(
            key.to_string(),
            format!("owner_type=member,owner_property=avatar,owner_id={owner_id}")
        );
    }

    #[test]
    fn bulk_operations_accept_zero_rows() {
        let helper = DaoHelper::system();
        let owner = OwnerRef::new("member", "avatar", Uuid::new_v4());

        assert_eq!(
            helper
                .delete_for_owner::<Attachment, _>(&owner, |_| Ok(0))
                .expect("zero deletes"),
            0
        );
        assert_eq!(
            helper
                .erase_for_owner::<Attachment, _>(&owner, || Ok(0))
                .expect("zero erases"),
            0
        );
    }

    #[test]
    fn list_for_owner_returns_independent_copies() {
        let helper = DaoHelper::system();
        let owner = OwnerRef::new("member", "avatar", Uuid::new_v4());
        let stored = vec![Attachment::new(owner.clone(), " face.png ", 12)];

        let mut listed = helper
            .list_for_owner::<Attachment, _, _>(&owner, || Ok(stored.iter().collect::<Vec<_>>()))
            .expect("list");
        listed[0].file_name.push_str(".bak");

        assert_eq!(listed[0].file_name, "face.png.bak");
        assert_eq!(stored[0].file_name, " face.png ");
    }
}
