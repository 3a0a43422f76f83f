//! Shared engine state and operation tracing.
//!
//! # Responsibility
//! - Hold the clock and id generator every mutating primitive consults.
//! - Emit `start`/`ok`/`error` events around every primitive.
//!
//! # Invariants
//! - The helper holds no mutable state besides what its collaborators own.
//! - Each mutating primitive reads the clock once and shares that value across
//!   all of its side effects.

use crate::clock::{Clock, SystemClock};
use crate::dao::error::{DaoError, DaoResult};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::model::capability::{EntityId, Timestamp};
use log::{debug, log_enabled, warn, Level};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Engine every DAO mixin delegates to.
///
/// Primitives are spread over the `lookup`, `mutation`, `soft_delete`,
/// `owner`, `upsert` and `credential` modules as `impl DaoHelper` blocks.
#[derive(Clone)]
pub struct DaoHelper {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl DaoHelper {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Helper wired to the system clock and random UUIDs.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock::new()), Arc::new(UuidGenerator))
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub(crate) fn next_id(&self) -> EntityId {
        self.ids.next_id()
    }
}

impl Default for DaoHelper {
    fn default() -> Self {
        Self::system()
    }
}

impl Debug for DaoHelper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaoHelper").finish_non_exhaustive()
    }
}

/// Tracing scope for one engine primitive.
pub(crate) struct OpTrace<'a> {
    event: &'static str,
    entity: &'static str,
    target: &'a dyn Display,
}

impl<'a> OpTrace<'a> {
    pub(crate) fn start(
        event: &'static str,
        entity: &'static str,
        target: &'a dyn Display,
    ) -> Self {
        debug!("event={event} module=dao status=start entity={entity} key={target}");
        Self {
            event,
            entity,
            target,
        }
    }

    pub(crate) fn ok(&self, detail: impl Display) {
        if log_enabled!(Level::Debug) {
            debug!(
                "event={} module=dao status=ok entity={} key={} {}",
                self.event, self.entity, self.target, detail
            );
        }
    }

    /// Logs the error branch of `result` and passes it through unchanged.
    pub(crate) fn check<T>(&self, result: DaoResult<T>) -> DaoResult<T> {
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    pub(crate) fn fail(&self, err: &DaoError) {
        match err {
            DaoError::NotFound { .. } => debug!(
                "event={} module=dao status=error entity={} key={} error_code={}",
                self.event,
                self.entity,
                self.target,
                err.error_code()
            ),
            _ => warn!(
                "event={} module=dao status=error entity={} key={} error_code={} error={}",
                self.event,
                self.entity,
                self.target,
                err.error_code(),
                err
            ),
        }
    }

    /// Fails with `NotFound` when a keyed write touched no rows.
    pub(crate) fn expect_rows(&self, affected: usize) -> DaoResult<usize> {
        if affected == 0 {
            let err = DaoError::NotFound {
                entity: self.entity,
                key: self.target.to_string(),
            };
            self.fail(&err);
            return Err(err);
        }
        Ok(affected)
    }
}
