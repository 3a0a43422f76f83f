//! Composite lookup keys.
//!
//! A key is an ordered list of `(name, value)` parts. The first part is the
//! primary key; the remaining parts are auxiliary keys (parent id, entity type).
//! The engine only uses keys for tracing and error reporting; matching is done
//! by the storage closure handed to it. The SQLite binding reads part names as
//! column names.

use crate::model::capability::EntityId;
use crate::model::credential::Credential;
use std::fmt::{Display, Formatter};

/// One value participating in a lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Id(EntityId),
    Text(String),
    Int(i64),
    Null,
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<EntityId> for KeyValue {
    fn from(value: EntityId) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Credentials are matched on their encoded `KIND:NUMBER` form.
impl From<&Credential> for KeyValue {
    fn from(value: &Credential) -> Self {
        Self::Text(value.encode())
    }
}

impl From<Credential> for KeyValue {
    fn from(value: Credential) -> Self {
        Self::from(&value)
    }
}

impl<T: Into<KeyValue>> From<Option<T>> for KeyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Named key value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPart {
    pub name: &'static str,
    pub value: KeyValue,
}

/// Primary key plus ordered auxiliary keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKey {
    parts: Vec<KeyPart>,
}

impl EntityKey {
    pub fn new(name: &'static str, value: impl Into<KeyValue>) -> Self {
        Self {
            parts: vec![KeyPart {
                name,
                value: value.into(),
            }],
        }
    }

    /// Key on the surrogate id.
    pub fn id(id: EntityId) -> Self {
        Self::new("id", id)
    }

    /// Appends one auxiliary key part.
    pub fn with(mut self, name: &'static str, value: impl Into<KeyValue>) -> Self {
        self.parts.push(KeyPart {
            name,
            value: value.into(),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.parts[0].name
    }

    pub fn value(&self) -> &KeyValue {
        &self.parts[0].value
    }

    /// Auxiliary parts in insertion order.
    pub fn others(&self) -> &[KeyPart] {
        &self.parts[1..]
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, part) in self.parts.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", part.name, part.value)?;
        }
        Ok(())
    }
}
