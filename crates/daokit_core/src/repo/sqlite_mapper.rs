//! Convention-driven SQLite mapper.
//!
//! # Responsibility
//! - Implement the mapper contracts for any table laid out as
//!   `id, create_time, modify_time, delete_time, <entity columns>`.
//! - Build `WHERE` clauses from `EntityKey` parts and a `Visibility`.
//!
//! # Invariants
//! - Key part names must be `id` or one of `SqliteEntity::COLUMNS`; anything
//!   else is rejected before SQL is built.
//! - Values are always bound, never interpolated.
//! - Updates never write `id`, `create_time` or `delete_time`.

use crate::dao::error::{DaoError, DaoResult};
use crate::dao::mapper::{Mapper, SoftDeleteMapper, Visibility};
use crate::model::capability::{EntityId, Record, SoftDelete, Timestamp, Timestamps};
use crate::model::key::{EntityKey, KeyValue};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;
use uuid::Uuid;

const LIFECYCLE_COLUMNS: &str = "id, create_time, modify_time, delete_time";

/// Table layout of an entity stored by `SqliteMapper`.
pub trait SqliteEntity: Record {
    const TABLE: &'static str;
    /// Entity columns in `bind_values` order, excluding lifecycle columns.
    const COLUMNS: &'static [&'static str];

    /// Values written on insert and update. Fails when a field cannot be
    /// stored in a form `from_row` reads back.
    fn bind_values(&self) -> DaoResult<Vec<Value>>;

    /// Rebuilds the entity from a row selected by `SqliteMapper`. Entity
    /// columns are read by name.
    fn from_row(row: &Row<'_>, id: EntityId, timestamps: Timestamps) -> DaoResult<Self>;
}

/// SQLite-backed mapper for one entity table.
pub struct SqliteMapper<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: SqliteEntity> SqliteMapper<'conn, E> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    fn column(name: &'static str) -> DaoResult<&'static str> {
        if name == "id" || E::COLUMNS.contains(&name) {
            Ok(name)
        } else {
            Err(DaoError::InvalidData(format!(
                "unknown column `{name}` for table `{}`",
                E::TABLE
            )))
        }
    }

    /// Appends the filter binds to `binds` and returns the `WHERE` clause.
    fn filter(
        key: Option<&EntityKey>,
        visibility: Visibility,
        binds: &mut Vec<Value>,
    ) -> DaoResult<String> {
        let mut clauses = Vec::new();
        for part in key.map_or(&[][..], EntityKey::parts) {
            let column = Self::column(part.name)?;
            match &part.value {
                KeyValue::Null => clauses.push(format!("{column} IS NULL")),
                value => {
                    clauses.push(format!("{column} = ?"));
                    binds.push(key_value_to_sql(value));
                }
            }
        }
        match visibility {
            Visibility::Active => clauses.push("delete_time IS NULL".to_string()),
            Visibility::Deleted => clauses.push("delete_time IS NOT NULL".to_string()),
            Visibility::All => {}
        }

        if clauses.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", clauses.join(" AND ")))
        }
    }

    fn select_sql(projection: &str, filter: &str) -> String {
        format!("SELECT {projection} FROM {}{filter}", E::TABLE)
    }

    fn entity_projection() -> String {
        format!("{LIFECYCLE_COLUMNS}, {}", E::COLUMNS.join(", "))
    }

    fn execute(&self, sql: &str, binds: Vec<Value>) -> DaoResult<usize> {
        Ok(self.conn.execute(sql, params_from_iter(binds))?)
    }

    fn parse_row(row: &Row<'_>) -> DaoResult<E> {
        let id = parse_uuid(&row.get::<_, String>("id")?, "id")?;
        let timestamps = Timestamps {
            create_time: Some(row.get("create_time")?),
            modify_time: row.get("modify_time")?,
            delete_time: row.get("delete_time")?,
        };
        E::from_row(row, id, timestamps)
    }
}

impl<E: SqliteEntity> Mapper<E> for SqliteMapper<'_, E> {
    fn insert(&self, entity: &E) -> DaoResult<usize> {
        let id = entity.id().ok_or(DaoError::MissingRequiredField {
            entity: E::ENTITY_NAME,
            field: "id",
        })?;
        let timestamps = entity.timestamps();
        let mut binds = vec![
            Value::Text(id.to_string()),
            optional_integer(timestamps.create_time),
            optional_integer(timestamps.modify_time),
            optional_integer(timestamps.delete_time),
        ];
        binds.extend(entity.bind_values()?);

        let placeholders = vec!["?"; binds.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            E::TABLE,
            Self::entity_projection()
        );
        self.execute(&sql, binds)
    }

    fn update_by_key(
        &self,
        key: &EntityKey,
        visibility: Visibility,
        entity: &E,
    ) -> DaoResult<usize> {
        let assignments = std::iter::once("modify_time = ?".to_string())
            .chain(E::COLUMNS.iter().map(|column| format!("{column} = ?")))
            .collect::<Vec<_>>()
            .join(", ");
        let mut binds = vec![optional_integer(entity.timestamps().modify_time)];
        binds.extend(entity.bind_values()?);
        let filter = Self::filter(Some(key), visibility, &mut binds)?;

        let sql = format!("UPDATE {} SET {assignments}{filter}", E::TABLE);
        self.execute(&sql, binds)
    }

    fn update_property_by_key(
        &self,
        key: &EntityKey,
        property: &'static str,
        value: &KeyValue,
        modify_time: Timestamp,
    ) -> DaoResult<usize> {
        let column = Self::column(property)?;
        let mut binds = vec![key_value_to_sql(value), Value::Integer(modify_time)];
        let filter = Self::filter(Some(key), Visibility::Active, &mut binds)?;

        let sql = format!(
            "UPDATE {} SET {column} = ?, modify_time = ?{filter}",
            E::TABLE
        );
        self.execute(&sql, binds)
    }

    fn select_by_key(&self, key: &EntityKey, visibility: Visibility) -> DaoResult<Option<E>> {
        let mut binds = Vec::new();
        let filter = Self::filter(Some(key), visibility, &mut binds)?;
        let sql = format!(
            "{} LIMIT 1",
            Self::select_sql(&Self::entity_projection(), &filter)
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::parse_row(row)?)),
            None => Ok(None),
        }
    }

    fn select_id_by_key(
        &self,
        key: &EntityKey,
        visibility: Visibility,
    ) -> DaoResult<Option<EntityId>> {
        let mut binds = Vec::new();
        let filter = Self::filter(Some(key), visibility, &mut binds)?;
        let sql = format!("{} LIMIT 1", Self::select_sql("id", &filter));

        let id = self
            .conn
            .query_row(&sql, params_from_iter(binds), |row| row.get::<_, String>(0))
            .optional()?;
        id.map(|text| parse_uuid(&text, "id")).transpose()
    }

    fn select_list(&self, key: Option<&EntityKey>, visibility: Visibility) -> DaoResult<Vec<E>> {
        let mut binds = Vec::new();
        let filter = Self::filter(key, visibility, &mut binds)?;
        let sql = format!(
            "{} ORDER BY create_time ASC, id ASC",
            Self::select_sql(&Self::entity_projection(), &filter)
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(Self::parse_row(row)?);
        }
        Ok(entities)
    }

    fn count(&self, key: Option<&EntityKey>, visibility: Visibility) -> DaoResult<usize> {
        let mut binds = Vec::new();
        let filter = Self::filter(key, visibility, &mut binds)?;
        let sql = Self::select_sql("COUNT(*)", &filter);

        let count = self
            .conn
            .query_row(&sql, params_from_iter(binds), |row| row.get::<_, i64>(0))?;
        usize::try_from(count)
            .map_err(|_| DaoError::InvalidData(format!("negative row count {count}")))
    }

    fn erase_by_key(&self, key: &EntityKey) -> DaoResult<usize> {
        let mut binds = Vec::new();
        let filter = Self::filter(Some(key), Visibility::All, &mut binds)?;
        self.execute(&format!("DELETE FROM {}{filter}", E::TABLE), binds)
    }
}

impl<E: SqliteEntity + SoftDelete> SoftDeleteMapper<E> for SqliteMapper<'_, E> {
    fn delete_by_key(&self, key: &EntityKey, delete_time: Timestamp) -> DaoResult<usize> {
        let mut binds = vec![Value::Integer(delete_time)];
        let filter = Self::filter(Some(key), Visibility::Active, &mut binds)?;
        self.execute(
            &format!("UPDATE {} SET delete_time = ?{filter}", E::TABLE),
            binds,
        )
    }

    fn restore_by_key(&self, key: &EntityKey, modify_time: Timestamp) -> DaoResult<usize> {
        let mut binds = vec![Value::Integer(modify_time)];
        let filter = Self::filter(Some(key), Visibility::Deleted, &mut binds)?;
        self.execute(
            &format!(
                "UPDATE {} SET delete_time = NULL, modify_time = ?{filter}",
                E::TABLE
            ),
            binds,
        )
    }

    fn purge_by_key(&self, key: &EntityKey) -> DaoResult<usize> {
        let mut binds = Vec::new();
        let filter = Self::filter(Some(key), Visibility::Deleted, &mut binds)?;
        self.execute(&format!("DELETE FROM {}{filter}", E::TABLE), binds)
    }

    fn purge_all(&self) -> DaoResult<usize> {
        let mut binds = Vec::new();
        let filter = Self::filter(None, Visibility::Deleted, &mut binds)?;
        self.execute(&format!("DELETE FROM {}{filter}", E::TABLE), binds)
    }
}

fn key_value_to_sql(value: &KeyValue) -> Value {
    match value {
        KeyValue::Id(id) => Value::Text(id.to_string()),
        KeyValue::Text(text) => Value::Text(text.clone()),
        KeyValue::Int(number) => Value::Integer(*number),
        KeyValue::Null => Value::Null,
    }
}

pub(crate) fn optional_integer(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

pub(crate) fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> DaoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|err| DaoError::InvalidData(format!("invalid uuid in `{column}`: {err}")))
}
