//! DAO error taxonomy and storage error translation.
//!
//! # Invariants
//! - The engine never recovers from an error; it only translates zero-row
//!   results and pre-flight findings into semantic variants.
//! - SQLite constraint failures are surfaced as `DuplicateKey` or
//!   `Field(..)`; everything else stays a transport `Db` error.

use crate::db::DbError;
use crate::model::credential::ModelError;
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DaoResult<T> = Result<T, DaoError>;

/// Field-level rule violated in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldViolationKind {
    NullRequired,
    TooLong,
    OutOfRange,
    MalformedFormat,
    ForeignKey,
}

impl FieldViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NullRequired => "null_required",
            Self::TooLong => "too_long",
            Self::OutOfRange => "out_of_range",
            Self::MalformedFormat => "malformed_format",
            Self::ForeignKey => "foreign_key",
        }
    }
}

/// Storage-reported field violation. `target` is the column or constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub kind: FieldViolationKind,
    pub target: String,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} violation on {}", self.kind.as_str(), self.target)
    }
}

#[derive(Debug)]
pub enum DaoError {
    /// Key-based target is absent or not in the expected lifecycle state.
    NotFound { entity: &'static str, key: String },
    /// Alternate key or credential already taken.
    DuplicateKey { entity: String, key: String },
    /// Required field is null, e.g. the parent reference of a scoped upsert.
    MissingRequiredField {
        entity: &'static str,
        field: &'static str,
    },
    /// Insert reported zero affected rows.
    UpdateFailed { entity: &'static str, key: String },
    Field(FieldViolation),
    Model(ModelError),
    Db(DbError),
    /// Persisted row cannot be mapped back to an entity.
    InvalidData(String),
}

impl DaoError {
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn duplicate_key(entity: impl Into<String>, key: impl Display) -> Self {
        Self::DuplicateKey {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Stable code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::UpdateFailed { .. } => "update_failed",
            Self::Field(violation) => violation.kind.as_str(),
            Self::Model(_) => "invalid_model",
            Self::Db(_) => "db_error",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for DaoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::DuplicateKey { entity, key } => write!(f, "duplicate {entity} key: {key}"),
            Self::MissingRequiredField { entity, field } => {
                write!(f, "{entity} is missing required field `{field}`")
            }
            Self::UpdateFailed { entity, key } => {
                write!(f, "{entity} write affected no rows: {key}")
            }
            Self::Field(violation) => write!(f, "{violation}"),
            Self::Model(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for DaoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::DuplicateKey { .. }
            | Self::MissingRequiredField { .. }
            | Self::UpdateFailed { .. }
            | Self::Field(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for DaoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<ModelError> for DaoError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<rusqlite::Error> for DaoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                if let Some(translated) =
                    translate_constraint(failure.extended_code, message.as_deref())
                {
                    return translated;
                }
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps an SQLite constraint failure onto the semantic taxonomy.
///
/// SQLite messages look like `UNIQUE constraint failed: members.code` or
/// `CHECK constraint failed: ck_members_code_length`.
fn translate_constraint(extended_code: i32, message: Option<&str>) -> Option<DaoError> {
    let message = message.unwrap_or_default();
    let target = message
        .split_once(": ")
        .map_or(message, |(_, detail)| detail)
        .to_string();

    let kind = match extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            let table = target
                .split_once('.')
                .map_or("unknown", |(table, _)| table)
                .to_string();
            return Some(DaoError::DuplicateKey { entity: table, key: target });
        }
        ffi::SQLITE_CONSTRAINT_NOTNULL => FieldViolationKind::NullRequired,
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => FieldViolationKind::ForeignKey,
        ffi::SQLITE_CONSTRAINT_CHECK => check_constraint_kind(&target)?,
        _ => return None,
    };

    Some(DaoError::Field(FieldViolation { kind, target }))
}

fn check_constraint_kind(constraint: &str) -> Option<FieldViolationKind> {
    if constraint.ends_with("_length") {
        Some(FieldViolationKind::TooLong)
    } else if constraint.ends_with("_range") {
        Some(FieldViolationKind::OutOfRange)
    } else if constraint.ends_with("_format") {
        Some(FieldViolationKind::MalformedFormat)
    } else {
        None
    }
}
