//! Key resolution and lookup primitives.
//!
//! # Invariants
//! - Matching is done by the supplied closure; the key only feeds tracing
//!   and error messages.
//! - `get_by_key` does not tell "absent" from "soft-deleted"; callers pick a
//!   delete-aware getter when they need that distinction.
//! - Every returned entity passes through the integrity guard.

use crate::dao::error::{DaoError, DaoResult};
use crate::dao::helper::{DaoHelper, OpTrace};
use crate::dao::sanitize::{sanitize, sanitize_list};
use crate::model::capability::Entity;
use crate::model::key::EntityKey;
use std::borrow::Borrow;

impl DaoHelper {
    pub fn exist_by_key<E, F>(&self, key: &EntityKey, tester: F) -> DaoResult<bool>
    where
        E: Entity,
        F: FnOnce() -> DaoResult<bool>,
    {
        let trace = OpTrace::start("dao_exist", E::ENTITY_NAME, key);
        let exists = trace.check(tester())?;
        trace.ok(format_args!("exists={exists}"));
        Ok(exists)
    }

    /// Looks up one entity, failing with `NotFound` when the getter yields
    /// nothing.
    pub fn get_by_key<E, R, F>(&self, key: &EntityKey, getter: F) -> DaoResult<E>
    where
        E: Entity,
        R: Borrow<E>,
        F: FnOnce() -> DaoResult<Option<R>>,
    {
        let trace = OpTrace::start("dao_get", E::ENTITY_NAME, key);
        match trace.check(getter())? {
            Some(found) => {
                trace.ok("found=true");
                Ok(sanitize(found.borrow()))
            }
            None => trace.check(Err(DaoError::not_found(E::ENTITY_NAME, key))),
        }
    }

    /// Same lookup as `get_by_key`, reporting absence as `None`.
    pub fn get_by_key_or_none<E, R, F>(&self, key: &EntityKey, getter: F) -> DaoResult<Option<E>>
    where
        E: Entity,
        R: Borrow<E>,
        F: FnOnce() -> DaoResult<Option<R>>,
    {
        let trace = OpTrace::start("dao_get_or_none", E::ENTITY_NAME, key);
        let found = trace.check(getter())?;
        trace.ok(format_args!("found={}", found.is_some()));
        Ok(found.map(|value| sanitize(value.borrow())))
    }

    /// Runs a multi-row read; `scope` labels the query in traces.
    pub fn get_list<E, R, F>(&self, scope: &str, getter: F) -> DaoResult<Vec<E>>
    where
        E: Entity,
        R: Borrow<E>,
        F: FnOnce() -> DaoResult<Vec<R>>,
    {
        let trace = OpTrace::start("dao_list", E::ENTITY_NAME, &scope);
        let rows = trace.check(getter())?;
        let values = sanitize_list(Some(rows));
        trace.ok(format_args!("count={}", values.len()));
        Ok(values)
    }

    pub fn count_by<E, F>(&self, scope: &str, counter: F) -> DaoResult<usize>
    where
        E: Entity,
        F: FnOnce() -> DaoResult<usize>,
    {
        let trace = OpTrace::start("dao_count", E::ENTITY_NAME, &scope);
        let count = trace.check(counter())?;
        trace.ok(format_args!("count={count}"));
        Ok(count)
    }
}
