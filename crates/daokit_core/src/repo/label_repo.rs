//! Label table mapping and DAO.
//!
//! Labels have no soft-delete lifecycle, so `LabelDao` only offers erase.

use crate::dao::error::DaoResult;
use crate::dao::helper::DaoHelper;
use crate::dao::mixin::{Dao, EntityTypeNameDao};
use crate::model::capability::{EntityId, Timestamps};
use crate::model::label::Label;
use crate::repo::sqlite_mapper::{optional_text, SqliteEntity, SqliteMapper};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl SqliteEntity for Label {
    const TABLE: &'static str = "labels";
    const COLUMNS: &'static [&'static str] = &["entity_type", "name", "color"];

    fn bind_values(&self) -> DaoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.entity_type.clone()),
            Value::Text(self.name.clone()),
            optional_text(self.color.as_deref()),
        ])
    }

    fn from_row(row: &Row<'_>, id: EntityId, timestamps: Timestamps) -> DaoResult<Self> {
        Ok(Self {
            id: Some(id),
            entity_type: row.get("entity_type")?,
            name: row.get("name")?,
            color: row.get("color")?,
            timestamps,
        })
    }
}

pub struct LabelDao<'conn> {
    helper: DaoHelper,
    mapper: SqliteMapper<'conn, Label>,
}

impl<'conn> LabelDao<'conn> {
    pub fn new(conn: &'conn Connection, helper: DaoHelper) -> Self {
        Self {
            helper,
            mapper: SqliteMapper::new(conn),
        }
    }
}

impl<'conn> Dao for LabelDao<'conn> {
    type Entity = Label;
    type Mapper = SqliteMapper<'conn, Label>;

    fn helper(&self) -> &DaoHelper {
        &self.helper
    }

    fn mapper(&self) -> &Self::Mapper {
        &self.mapper
    }
}

impl EntityTypeNameDao for LabelDao<'_> {}
