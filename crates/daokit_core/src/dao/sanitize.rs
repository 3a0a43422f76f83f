//! Read-result integrity guard.
//!
//! # Responsibility
//! - Turn whatever the storage layer hands back (owned rows, `&E` borrowed
//!   from a cache, `Arc<E>` shared handles) into independent owned copies.
//! - Run the entity's normalize hook on the copy.
//!
//! # Invariants
//! - Applied at every read exit of the engine, including list reads.
//! - Mutating a returned value can never reach storage-owned state.

use crate::model::capability::Entity;
use std::borrow::Borrow;

/// Returns a normalized, independent copy of `value`.
pub fn sanitize<E: Entity>(value: &E) -> E {
    let mut copy = value.clone();
    copy.normalize();
    copy
}

pub fn sanitize_option<E, R>(value: Option<R>) -> Option<E>
where
    E: Entity,
    R: Borrow<E>,
{
    value.map(|value| sanitize(value.borrow()))
}

/// Sanitizes every element; an absent or empty input yields an empty list.
pub fn sanitize_list<E, I>(values: Option<I>) -> Vec<E>
where
    E: Entity,
    I: IntoIterator,
    I::Item: Borrow<E>,
{
    values
        .into_iter()
        .flatten()
        .map(|value| sanitize(value.borrow()))
        .collect()
}
