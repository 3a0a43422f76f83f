//! Generic DAO engine with a reference SQLite binding.
//! Concrete DAOs compose capability mixins; every mixin delegates to the
//! `DaoHelper` engine.

pub mod clock;
pub mod dao;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod repo;

pub use clock::{Clock, SystemClock};
pub use dao::{
    CodeDao, CredentialDao, Dao, DaoError, DaoHelper, DaoResult, EntityTypeNameDao,
    FieldViolation, FieldViolationKind, Mapper, NameDao, OwnerDao, ParentCodeDao, ParentNameDao,
    SoftDeleteDao, SoftDeleteMapper, Visibility,
};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use ids::{IdGenerator, UuidGenerator};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::attachment::Attachment;
pub use model::capability::{
    Entity, EntityId, HasCode, HasCredential, HasEntityType, HasName, HasOwner, HasParent,
    Normalize, Record, SoftDelete, Timestamp, Timestamps,
};
pub use model::credential::{Credential, CredentialKind, ModelError};
pub use model::key::{EntityKey, KeyPart, KeyValue};
pub use model::label::Label;
pub use model::member::Member;
pub use model::organization::Organization;
pub use model::owner::OwnerRef;
pub use repo::{AttachmentDao, LabelDao, MemberDao, OrganizationDao};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
