//! Reference SQLite binding for the DAO engine.
//!
//! # Responsibility
//! - Map the bundled entities onto their tables through `SqliteMapper`.
//! - Assemble concrete DAOs from the capability mixins.
//!
//! # Invariants
//! - DAOs borrow a connection; the caller owns transaction boundaries.
//! - SQLite constraint failures surface as semantic `DaoError` variants.

pub mod attachment_repo;
pub mod label_repo;
pub mod member_repo;
pub mod organization_repo;
pub mod sqlite_mapper;

pub use attachment_repo::AttachmentDao;
pub use label_repo::LabelDao;
pub use member_repo::MemberDao;
pub use organization_repo::OrganizationDao;
pub use sqlite_mapper::{SqliteEntity, SqliteMapper};
