//! Organization table mapping and DAO.
//!
//! # Invariants
//! - `code` and `name` are globally unique, including soft-deleted rows.

use crate::dao::error::DaoResult;
use crate::dao::helper::DaoHelper;
use crate::dao::mixin::{CodeDao, Dao, NameDao, SoftDeleteDao};
use crate::model::capability::{EntityId, Timestamp, Timestamps};
use crate::model::key::EntityKey;
use crate::model::organization::Organization;
use crate::repo::sqlite_mapper::{optional_text, SqliteEntity, SqliteMapper};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl SqliteEntity for Organization {
    const TABLE: &'static str = "organizations";
    const COLUMNS: &'static [&'static str] = &["code", "name", "description"];

    fn bind_values(&self) -> DaoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.code.clone()),
            Value::Text(self.name.clone()),
            optional_text(self.description.as_deref()),
        ])
    }

    fn from_row(row: &Row<'_>, id: EntityId, timestamps: Timestamps) -> DaoResult<Self> {
        Ok(Self {
            id: Some(id),
            code: row.get("code")?,
            name: row.get("name")?,
            description: row.get("description")?,
            timestamps,
        })
    }
}

pub struct OrganizationDao<'conn> {
    helper: DaoHelper,
    mapper: SqliteMapper<'conn, Organization>,
}

impl<'conn> OrganizationDao<'conn> {
    pub fn new(conn: &'conn Connection, helper: DaoHelper) -> Self {
        Self {
            helper,
            mapper: SqliteMapper::new(conn),
        }
    }

    /// Renames the active organization holding `code`.
    pub fn rename_by_code(&self, code: &str, name: &str) -> DaoResult<Timestamp> {
        self.update_property(&EntityKey::new("code", code), "name", name.trim().to_string())
    }

    /// Sets or clears the description of the active organization `id`.
    pub fn describe(&self, id: EntityId, description: Option<&str>) -> DaoResult<Timestamp> {
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        self.update_property(&EntityKey::id(id), "description", description)
    }
}

impl<'conn> Dao for OrganizationDao<'conn> {
    type Entity = Organization;
    type Mapper = SqliteMapper<'conn, Organization>;

    fn helper(&self) -> &DaoHelper {
        &self.helper
    }

    fn mapper(&self) -> &Self::Mapper {
        &self.mapper
    }
}

impl SoftDeleteDao for OrganizationDao<'_> {}
impl CodeDao for OrganizationDao<'_> {}
impl NameDao for OrganizationDao<'_> {}
