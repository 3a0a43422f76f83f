//! Member table mapping and DAO.
//!
//! # Invariants
//! - `code` and `name` are unique within the organization.
//! - `credential` is stored encoded (`KIND:NUMBER`) and unique when present.
//!   Malformed credentials are rejected before any write.
//! - Credential writes go through the duplicate guard before storage.

use crate::dao::error::{DaoError, DaoResult};
use crate::dao::helper::DaoHelper;
use crate::dao::mapper::{Mapper, Visibility};
use crate::dao::mixin::{CredentialDao, Dao, ParentCodeDao, ParentNameDao, SoftDeleteDao};
use crate::model::capability::{EntityId, HasParent, Timestamp, Timestamps};
use crate::model::credential::Credential;
use crate::model::key::EntityKey;
use crate::model::member::Member;
use crate::repo::sqlite_mapper::{optional_text, parse_uuid, SqliteEntity, SqliteMapper};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl SqliteEntity for Member {
    const TABLE: &'static str = "members";
    const COLUMNS: &'static [&'static str] =
        &["organization_id", "code", "name", "credential", "email"];

    fn bind_values(&self) -> DaoResult<Vec<Value>> {
        let organization_id = self.organization_id.map(|id| id.to_string());
        let credential = match &self.credential {
            Some(credential) => {
                credential.validate()?;
                Some(credential.encode())
            }
            None => None,
        };
        Ok(vec![
            optional_text(organization_id.as_deref()),
            Value::Text(self.code.clone()),
            Value::Text(self.name.clone()),
            optional_text(credential.as_deref()),
            optional_text(self.email.as_deref()),
        ])
    }

    fn from_row(row: &Row<'_>, id: EntityId, timestamps: Timestamps) -> DaoResult<Self> {
        let organization_id = row
            .get::<_, Option<String>>("organization_id")?
            .map(|text| parse_uuid(&text, "organization_id"))
            .transpose()?;
        let credential = row
            .get::<_, Option<String>>("credential")?
            .map(|text| {
                Credential::parse(&text).map_err(|err| {
                    DaoError::InvalidData(format!("invalid credential for member {id}: {err}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id: Some(id),
            organization_id,
            code: row.get("code")?,
            name: row.get("name")?,
            credential,
            email: row.get("email")?,
            timestamps,
        })
    }
}

pub struct MemberDao<'conn> {
    helper: DaoHelper,
    mapper: SqliteMapper<'conn, Member>,
}

impl<'conn> MemberDao<'conn> {
    pub fn new(conn: &'conn Connection, helper: DaoHelper) -> Self {
        Self {
            helper,
            mapper: SqliteMapper::new(conn),
        }
    }

    /// Active members of one organization, oldest first.
    pub fn list_by_organization(&self, organization_id: EntityId) -> DaoResult<Vec<Member>> {
        let key = EntityKey::new(Member::PARENT_ID_FIELD, organization_id);
        self.helper
            .get_list::<Member, Member, _>(Member::PARENT_ID_FIELD, || {
                self.mapper.select_list(Some(&key), Visibility::Active)
            })
    }

    /// Replaces the credential of the active member `id`.
    ///
    /// # Errors
    /// - `DuplicateKey` when another member already holds the credential.
    /// - `NotFound` when no active member has this id.
    pub fn change_credential(
        &self,
        id: EntityId,
        credential: Option<Credential>,
    ) -> DaoResult<Timestamp> {
        let mut probe = self.get(id)?;
        probe.credential = credential;
        self.helper.check_duplicate_before_update(&probe, |credential| {
            self.mapper
                .select_id_by_key(&EntityKey::new("credential", credential), Visibility::All)
        })?;
        self.update_property(&EntityKey::id(id), "credential", probe.credential)
    }
}

impl<'conn> Dao for MemberDao<'conn> {
    type Entity = Member;
    type Mapper = SqliteMapper<'conn, Member>;

    fn helper(&self) -> &DaoHelper {
        &self.helper
    }

    fn mapper(&self) -> &Self::Mapper {
        &self.mapper
    }
}

impl SoftDeleteDao for MemberDao<'_> {}
impl ParentCodeDao for MemberDao<'_> {}
impl ParentNameDao for MemberDao<'_> {}
impl CredentialDao for MemberDao<'_> {}
