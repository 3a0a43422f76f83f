//! Soft-delete lifecycle primitives.
//!
//! ```text
//!   Active --delete--> Deleted --purge--> (gone)
//!     ^                   |
//!     +-----restore-------+
//!   Active | Deleted --erase--> (gone)
//! ```
//!
//! # Invariants
//! - The state precondition lives in the storage closure (`delete_time IS
//!   NULL` for delete, `IS NOT NULL` for restore/purge); zero affected rows
//!   therefore means "absent or wrong state" and maps to `NotFound`.
//! - `erase` ignores the tombstone and is available for every record type.
//! - `purge_all` never fails on an empty result.

use crate::dao::error::DaoResult;
use crate::dao::helper::{DaoHelper, OpTrace};
use crate::model::capability::{Record, SoftDelete, Timestamp};
use crate::model::key::EntityKey;

impl DaoHelper {
    /// Active -> Deleted. The deleter receives the tombstone timestamp.
    pub fn delete<E, F>(&self, key: &EntityKey, deleter: F) -> DaoResult<Timestamp>
    where
        E: SoftDelete,
        F: FnOnce(Timestamp) -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_delete", E::ENTITY_NAME, key);
        let now = self.now();
        let affected = trace.check(deleter(now))?;
        trace.expect_rows(affected)?;
        trace.ok(format_args!("delete_time={now}"));
        Ok(now)
    }

    /// Deleted -> Active. The restorer receives the new `modify_time`.
    pub fn restore<E, F>(&self, key: &EntityKey, restorer: F) -> DaoResult<Timestamp>
    where
        E: SoftDelete,
        F: FnOnce(Timestamp) -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_restore", E::ENTITY_NAME, key);
        let now = self.now();
        let affected = trace.check(restorer(now))?;
        trace.expect_rows(affected)?;
        trace.ok(format_args!("modify_time={now}"));
        Ok(now)
    }

    /// Deleted -> gone.
    pub fn purge<E, F>(&self, key: &EntityKey, purger: F) -> DaoResult<()>
    where
        E: SoftDelete,
        F: FnOnce() -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_purge", E::ENTITY_NAME, key);
        let affected = trace.check(purger())?;
        trace.expect_rows(affected)?;
        trace.ok("purged=1");
        Ok(())
    }

    /// Removes every Deleted entity; returns how many were removed.
    pub fn purge_all<E, F>(&self, purger: F) -> DaoResult<usize>
    where
        E: SoftDelete,
        F: FnOnce() -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_purge_all", E::ENTITY_NAME, &"deleted");
        let purged = trace.check(purger())?;
        trace.ok(format_args!("purged={purged}"));
        Ok(purged)
    }

    /// Active | Deleted -> gone.
    pub fn erase<E, F>(&self, key: &EntityKey, eraser: F) -> DaoResult<()>
    where
        E: Record,
        F: FnOnce() -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_erase", E::ENTITY_NAME, key);
        let affected = trace.check(eraser())?;
        trace.expect_rows(affected)?;
        trace.ok("erased=1");
        Ok(())
    }

    /// Whether an Active entity exists for `key`.
    pub fn exist_non_deleted<E, F>(&self, key: &EntityKey, tester: F) -> DaoResult<bool>
    where
        E: SoftDelete,
        F: FnOnce() -> DaoResult<bool>,
    {
        let trace = OpTrace::start("dao_exist_non_deleted", E::ENTITY_NAME, key);
        let exists = trace.check(tester())?;
        trace.ok(format_args!("exists={exists}"));
        Ok(exists)
    }
}
