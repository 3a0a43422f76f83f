mod common;

use daokit_core::dao::mapper::Visibility;
use daokit_core::{
    CodeDao, Dao, DaoError, EntityKey, Label, LabelDao, Mapper, NameDao, Organization,
    OrganizationDao, SoftDeleteDao,
};
use std::collections::HashSet;

#[test]
fn assigned_ids_are_distinct_and_never_reused() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut seen = HashSet::new();

    for index in 0..4 {
        let mut org = Organization::new(format!("C{index}"), format!("Org {index}"));
        dao.add(&mut org).unwrap();
        assert!(seen.insert(org.id.unwrap()));
        if index % 2 == 0 {
            dao.erase(org.id.unwrap()).unwrap();
        } else {
            dao.delete(org.id.unwrap()).unwrap();
            dao.purge(org.id.unwrap()).unwrap();
        }
    }

    let mut late = Organization::new("LATE", "Late");
    dao.add(&mut late).unwrap();
    assert!(seen.insert(late.id.unwrap()));
}

#[test]
fn add_overrides_caller_supplied_lifecycle_fields() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());

    let mut org = Organization::new(" acme ", " Acme ");
    org.timestamps.modify_time = Some(42);
    org.timestamps.delete_time = Some(43);
    let created = dao.add(&mut org).unwrap();

    let stored = dao.get(org.id.unwrap()).unwrap();
    assert_eq!(stored.code, "ACME");
    assert_eq!(stored.name, "Acme");
    assert_eq!(stored.timestamps.create_time, Some(created));
    assert_eq!(stored.timestamps.modify_time, None);
    assert_eq!(stored.timestamps.delete_time, None);
}

#[test]
fn batch_add_shares_one_create_time() {
    let conn = common::open();
    let dao = LabelDao::new(&conn, common::helper());
    let mut labels = vec![Label::new("member", "vip"), Label::new("member", "new")];

    let created = dao.batch_add(&mut labels).unwrap();

    let stored = dao.get_all().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored
        .iter()
        .all(|label| label.timestamps.create_time == Some(created)));
    assert_ne!(labels[0].id, labels[1].id);
}

#[test]
fn batch_add_stops_at_first_failing_row() {
    let conn = common::open();
    let dao = LabelDao::new(&conn, common::helper());
    let mut labels = vec![
        Label::new("member", "vip"),
        Label::new("member", " vip "),
        Label::new("member", "late"),
    ];

    let err = dao.batch_add(&mut labels).unwrap_err();

    assert!(matches!(err, DaoError::DuplicateKey { .. }));
    assert_eq!(dao.count().unwrap(), 1);
    assert!(labels[2].id.is_none());
}

#[test]
fn update_stamps_modify_time_and_keeps_identity() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut org = Organization::new("ACME", "Acme");
    let created = dao.add(&mut org).unwrap();

    org.description = Some("  widgets ".to_string());
    let modified = dao.update(&mut org).unwrap();

    let stored = dao.get_by_code("ACME").unwrap();
    assert!(modified > created);
    assert_eq!(stored.id, org.id);
    assert_eq!(stored.description.as_deref(), Some("widgets"));
    assert_eq!(stored.timestamps.create_time, Some(created));
    assert_eq!(stored.timestamps.modify_time, Some(modified));
}

#[test]
fn zero_affected_rows_map_to_not_found_for_keyed_writes() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut ghost = Organization::new("GHOST", "Ghost");
    ghost.id = Some(uuid::Uuid::new_v4());
    let id = ghost.id.unwrap();

    let results = [
        dao.update(&mut ghost).map(|_| ()),
        dao.delete(id).map(|_| ()),
        dao.restore(id).map(|_| ()),
        dao.purge(id),
        dao.erase(id),
    ];
    for result in results {
        assert!(matches!(result, Err(DaoError::NotFound { .. })));
    }
}

#[test]
fn zero_affected_rows_on_insert_is_update_failed() {
    let helper = common::helper();
    let mut org = Organization::new("ACME", "Acme");

    let err = helper.add(&mut org, |_| Ok(0)).unwrap_err();
    assert!(matches!(
        err,
        DaoError::UpdateFailed {
            entity: "organization",
            ..
        }
    ));
}

#[test]
fn update_without_id_is_missing_required_field() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());

    let err = dao.update(&mut Organization::new("NEW", "New")).unwrap_err();
    assert!(matches!(
        err,
        DaoError::MissingRequiredField { field: "id", .. }
    ));
}

#[test]
fn property_update_touches_one_column() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut org = Organization::new("ACME", "Acme");
    dao.add(&mut org).unwrap();
    dao.describe(org.id.unwrap(), Some("widgets")).unwrap();

    let modified = dao.rename_by_code("ACME", "  Acme Global ").unwrap();

    let stored = dao.get_by_code("ACME").unwrap();
    assert_eq!(stored.name, "Acme Global");
    assert_eq!(stored.description.as_deref(), Some("widgets"));
    assert_eq!(stored.timestamps.modify_time, Some(modified));

    let err = dao.rename_by_code("NOPE", "Nobody").unwrap_err();
    assert!(matches!(err, DaoError::NotFound { .. }));
}

#[test]
fn unknown_key_columns_are_rejected_before_sql() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());

    let err = dao
        .mapper()
        .select_by_key(&EntityKey::new("nickname", "acme"), Visibility::All)
        .unwrap_err();
    assert!(matches!(err, DaoError::InvalidData(_)));
}

#[test]
fn update_by_code_and_by_name_rewrite_the_key_holder() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut org = Organization::new("ACME", "Acme");
    dao.add(&mut org).unwrap();
    let id = org.id.unwrap();

    let mut by_code = Organization::new(" acme ", "Acme Corp");
    let modified = dao.update_by_code(&mut by_code).unwrap();
    let stored = dao.get_or_none(id).unwrap().unwrap();
    assert_eq!(stored.name, "Acme Corp");
    assert_eq!(stored.timestamps.modify_time, Some(modified));

    let mut by_name = Organization::new("ACME-2", " Acme Corp ");
    by_name.description = Some("renamed".to_string());
    dao.update_by_name(&mut by_name).unwrap();
    let stored = dao.get(id).unwrap();
    assert_eq!(stored.code, "ACME-2");
    assert_eq!(stored.description.as_deref(), Some("renamed"));

    let err = dao
        .update_by_code(&mut Organization::new("NOPE", "Nobody"))
        .unwrap_err();
    assert!(matches!(err, DaoError::NotFound { .. }));
}

#[test]
fn update_by_code_reaches_soft_deleted_row_without_restoring_it() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut org = Organization::new("ACME", "Acme");
    dao.add(&mut org).unwrap();
    let id = org.id.unwrap();
    dao.delete(id).unwrap();

    dao.update_by_code(&mut Organization::new("ACME", "Acme Archived"))
        .unwrap();

    assert!(dao.get_or_none(id).unwrap().is_none());
    let stored = dao.get_deleted(id).unwrap();
    assert_eq!(stored.name, "Acme Archived");
    assert!(stored.timestamps.is_deleted());
}
