//! Pre-flight duplicate guard for the optional credential key.
//!
//! # Invariants
//! - An entity without a credential is never checked and always passes.
//! - The credential is normalized and validated before storage is queried,
//!   so the numbers `ab-12 34` and `AB1234` collide.
//! - On update, the entity's own credential is not a duplicate.

use crate::dao::error::{DaoError, DaoResult};
use crate::dao::helper::{DaoHelper, OpTrace};
use crate::model::capability::{EntityId, HasCredential, Normalize};
use crate::model::credential::Credential;
use crate::model::key::EntityKey;

impl DaoHelper {
    /// Fails with `DuplicateKey` when any stored entity holds the credential.
    pub fn check_duplicate_before_add<E, F>(&self, entity: &E, tester: F) -> DaoResult<()>
    where
        E: HasCredential,
        F: FnOnce(&Credential) -> DaoResult<bool>,
    {
        let Some(credential) = canonical_credential(entity)? else {
            return Ok(());
        };
        let key = EntityKey::new("credential", &credential);
        let trace = OpTrace::start("dao_credential_check_add", E::ENTITY_NAME, &key);
        if trace.check(tester(&credential))? {
            return trace.check(Err(DaoError::duplicate_key(E::ENTITY_NAME, &key)));
        }
        trace.ok("duplicate=false");
        Ok(())
    }

    /// Fails with `DuplicateKey` when a different entity holds the credential.
    ///
    /// `lookup` returns the id currently holding the credential, if any.
    pub fn check_duplicate_before_update<E, F>(&self, entity: &E, lookup: F) -> DaoResult<()>
    where
        E: HasCredential,
        F: FnOnce(&Credential) -> DaoResult<Option<EntityId>>,
    {
        let Some(credential) = canonical_credential(entity)? else {
            return Ok(());
        };
        let key = EntityKey::new("credential", &credential);
        let trace = OpTrace::start("dao_credential_check_update", E::ENTITY_NAME, &key);
        match trace.check(lookup(&credential))? {
            Some(holder) if Some(holder) != entity.id() => {
                trace.check(Err(DaoError::duplicate_key(E::ENTITY_NAME, &key)))
            }
            holder => {
                trace.ok(format_args!("held_by_self={}", holder.is_some()));
                Ok(())
            }
        }
    }
}

fn canonical_credential<E: HasCredential>(entity: &E) -> DaoResult<Option<Credential>> {
    let Some(credential) = entity.credential() else {
        return Ok(None);
    };
    let mut credential = credential.clone();
    credential.normalize();
    credential.validate()?;
    Ok(Some(credential))
}
