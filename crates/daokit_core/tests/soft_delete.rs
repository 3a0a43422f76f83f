mod common;

use daokit_core::{
    CodeDao, Dao, DaoError, Organization, OrganizationDao, SoftDeleteDao,
};

fn seeded(dao: &OrganizationDao<'_>, code: &str) -> Organization {
    let mut org = Organization::new(code, format!("Org {code}"));
    dao.add(&mut org).unwrap();
    org
}

#[test]
fn delete_hides_and_restore_brings_back() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let org = seeded(&dao, "ACME");
    let id = org.id.unwrap();
    let created = org.timestamps.create_time.unwrap();

    let deleted = dao.delete(id).unwrap();
    assert!(deleted > created);
    assert!(matches!(dao.get(id), Err(DaoError::NotFound { .. })));
    assert!(!dao.exist_non_deleted(id).unwrap());
    assert_eq!(
        dao.get_deleted(id).unwrap().timestamps.delete_time,
        Some(deleted)
    );
    assert_eq!(dao.get_including_deleted(id).unwrap().id, Some(id));

    let restored = dao.restore(id).unwrap();
    assert!(restored > deleted);
    assert!(dao.exist_non_deleted(id).unwrap());

    let mut after = dao.get(id).unwrap();
    assert_eq!(after.timestamps.modify_time, Some(restored));
    after.timestamps.modify_time = org.timestamps.modify_time;
    assert_eq!(after, org);
}

#[test]
fn delete_and_restore_require_the_matching_state() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let id = seeded(&dao, "ACME").id.unwrap();

    assert!(matches!(dao.restore(id), Err(DaoError::NotFound { .. })));
    dao.delete(id).unwrap();
    assert!(matches!(dao.delete(id), Err(DaoError::NotFound { .. })));
}

#[test]
fn purge_requires_deleted_state_and_is_terminal() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let id = seeded(&dao, "ACME").id.unwrap();

    assert!(matches!(dao.purge(id), Err(DaoError::NotFound { .. })));
    dao.delete(id).unwrap();
    dao.purge(id).unwrap();

    assert_terminal(&dao, id);
}

#[test]
fn erase_ignores_state_and_is_terminal() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let active = seeded(&dao, "LIVE").id.unwrap();
    let deleted = seeded(&dao, "GONE").id.unwrap();
    dao.delete(deleted).unwrap();

    dao.erase(active).unwrap();
    dao.erase(deleted).unwrap();

    assert_terminal(&dao, active);
    assert_terminal(&dao, deleted);
    assert!(matches!(dao.erase(active), Err(DaoError::NotFound { .. })));
}

#[test]
fn purge_all_removes_only_deleted_rows() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    assert_eq!(dao.purge_all().unwrap(), 0);

    let keep = seeded(&dao, "KEEP").id.unwrap();
    for code in ["OLD1", "OLD2"] {
        let id = seeded(&dao, code).id.unwrap();
        dao.delete(id).unwrap();
    }
    assert_eq!(dao.get_all_deleted().unwrap().len(), 2);

    assert_eq!(dao.purge_all().unwrap(), 2);
    assert!(dao.get_all_deleted().unwrap().is_empty());
    assert!(dao.exists(keep).unwrap());
    assert_eq!(dao.purge_all().unwrap(), 0);
}

#[test]
fn delete_by_code_only_reaches_active_rows() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    seeded(&dao, "ACME");

    dao.delete_by_code("ACME").unwrap();
    assert!(dao.get_by_code_or_none("ACME").unwrap().is_none());
    assert!(matches!(
        dao.delete_by_code("ACME"),
        Err(DaoError::NotFound { .. })
    ));
}

fn assert_terminal(dao: &OrganizationDao<'_>, id: daokit_core::EntityId) {
    assert!(matches!(dao.get(id), Err(DaoError::NotFound { .. })));
    assert!(matches!(
        dao.get_including_deleted(id),
        Err(DaoError::NotFound { .. })
    ));
    assert!(matches!(dao.delete(id), Err(DaoError::NotFound { .. })));
    assert!(matches!(dao.restore(id), Err(DaoError::NotFound { .. })));
    assert!(matches!(dao.purge(id), Err(DaoError::NotFound { .. })));
}
