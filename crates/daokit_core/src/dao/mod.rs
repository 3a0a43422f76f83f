//! Generic DAO engine.
//!
//! # Responsibility
//! - Run every storage call through one engine primitive that adds
//!   timestamping, id assignment, normalization, tracing, error translation
//!   and result sanitization.
//! - Expose the engine to concrete DAOs through the `Dao` root contract and
//!   capability mixins.
//!
//! # Invariants
//! - The engine never starts or commits transactions; callers run
//!   primitives inside their own transaction boundary.
//! - Every value leaving a read primitive is an owned, normalized copy.
//! - Zero affected rows become `NotFound` for keyed writes and
//!   `UpdateFailed` for inserts.

pub mod credential;
pub mod error;
pub mod helper;
pub mod lookup;
pub mod mapper;
pub mod mixin;
pub mod mutation;
pub mod owner;
pub mod sanitize;
pub mod soft_delete;
pub mod upsert;

pub use error::{DaoError, DaoResult, FieldViolation, FieldViolationKind};
pub use helper::DaoHelper;
pub use mapper::{Mapper, SoftDeleteMapper, Visibility};
pub use mixin::{
    CodeDao, CredentialDao, Dao, EntityTypeNameDao, NameDao, OwnerDao, ParentCodeDao,
    ParentNameDao, SoftDeleteDao,
};
pub use owner::owner_key;
pub use sanitize::{sanitize, sanitize_list, sanitize_option};
pub use upsert::{
    code_key, credential_key, entity_type_name_key, name_key, parent_code_key, parent_name_key,
};
