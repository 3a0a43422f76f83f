//! Attachment table mapping and DAO.

use crate::dao::error::DaoResult;
use crate::dao::helper::DaoHelper;
use crate::dao::mixin::{Dao, OwnerDao, SoftDeleteDao};
use crate::model::attachment::Attachment;
use crate::model::capability::{EntityId, Timestamps};
use crate::model::owner::OwnerRef;
use crate::repo::sqlite_mapper::{parse_uuid, SqliteEntity, SqliteMapper};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl SqliteEntity for Attachment {
    const TABLE: &'static str = "attachments";
    const COLUMNS: &'static [&'static str] = &[
        "owner_type",
        "owner_property",
        "owner_id",
        "file_name",
        "content_type",
        "size_bytes",
    ];

    fn bind_values(&self) -> DaoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.owner.entity_type.clone()),
            Value::Text(self.owner.property.clone()),
            Value::Text(self.owner.owner_id.to_string()),
            Value::Text(self.file_name.clone()),
            Value::Text(self.content_type.clone()),
            Value::Integer(self.size_bytes),
        ])
    }

    fn from_row(row: &Row<'_>, id: EntityId, timestamps: Timestamps) -> DaoResult<Self> {
        let owner_id = parse_uuid(&row.get::<_, String>("owner_id")?, "owner_id")?;
        Ok(Self {
            id: Some(id),
            owner: OwnerRef::new(
                row.get::<_, String>("owner_type")?,
                row.get::<_, String>("owner_property")?,
                owner_id,
            ),
            file_name: row.get("file_name")?,
            content_type: row.get("content_type")?,
            size_bytes: row.get("size_bytes")?,
            timestamps,
        })
    }
}

pub struct AttachmentDao<'conn> {
    helper: DaoHelper,
    mapper: SqliteMapper<'conn, Attachment>,
}

impl<'conn> AttachmentDao<'conn> {
    pub fn new(conn: &'conn Connection, helper: DaoHelper) -> Self {
        Self {
            helper,
            mapper: SqliteMapper::new(conn),
        }
    }
}

impl<'conn> Dao for AttachmentDao<'conn> {
    type Entity = Attachment;
    type Mapper = SqliteMapper<'conn, Attachment>;

    fn helper(&self) -> &DaoHelper {
        &self.helper
    }

    fn mapper(&self) -> &Self::Mapper {
        &self.mapper
    }
}

impl SoftDeleteDao for AttachmentDao<'_> {}
impl OwnerDao for AttachmentDao<'_> {}
