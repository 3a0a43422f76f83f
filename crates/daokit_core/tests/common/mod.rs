#![allow(dead_code)]

use daokit_core::{open_db_in_memory, Clock, DaoHelper, EntityId, IdGenerator, Timestamp};
use rusqlite::Connection;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub const START_TIME: Timestamp = 1_000;

/// Clock advancing by one millisecond per reading.
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn starting_at(time: Timestamp) -> Self {
        Self(AtomicI64::new(time))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Ids `00000000-0000-0000-0000-000000000001`, `...02`, ...
#[derive(Default)]
pub struct SequenceIds(AtomicU64);

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> EntityId {
        let next = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        Uuid::from_u128(u128::from(next))
    }
}

pub fn helper() -> DaoHelper {
    DaoHelper::new(
        Arc::new(ManualClock::starting_at(START_TIME)),
        Arc::new(SequenceIds::default()),
    )
}

pub fn open() -> Connection {
    open_db_in_memory().unwrap()
}
