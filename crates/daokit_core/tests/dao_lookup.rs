mod common;

use common::START_TIME;
use daokit_core::{CodeDao, Dao, DaoError, EntityKey, Organization, OrganizationDao};
use std::collections::HashMap;
use std::sync::Arc;

#[test]
fn added_entity_is_reachable_by_code_with_id_and_create_time() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());

    let mut org = Organization::new("x", "Org X");
    let created = dao.add(&mut org).unwrap();

    let found = dao.get_by_code("X").unwrap();
    assert_eq!(created, START_TIME);
    assert_eq!(found.id, org.id);
    assert!(found.id.is_some());
    assert_eq!(found.timestamps.create_time, Some(created));
    assert_eq!(found.timestamps.modify_time, None);
    assert_eq!(found, org);
}

#[test]
fn missing_code_reports_not_found_with_key() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());

    let err = dao.get_by_code("NOPE").unwrap_err();
    match err {
        DaoError::NotFound { entity, key } => {
            assert_eq!(entity, "organization");
            assert_eq!(key, "code=NOPE");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(dao.get_by_code_or_none("NOPE").unwrap().is_none());
    assert!(!dao.exists_by_code("NOPE").unwrap());
}

#[test]
fn mutating_a_returned_value_does_not_leak_into_later_reads() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    let mut org = Organization::new("ACME", "Acme");
    dao.add(&mut org).unwrap();

    let mut first = dao.get_by_code("ACME").unwrap();
    first.name.push_str(" (edited)");
    first.description = Some("local only".to_string());

    let second = dao.get_by_code("ACME").unwrap();
    assert_eq!(second.name, "Acme");
    assert!(second.description.is_none());
}

#[test]
fn cached_getter_results_are_copied_before_leaving_the_engine() {
    let helper = common::helper();
    let cache: HashMap<&str, Arc<Organization>> =
        HashMap::from([("ACME", Arc::new(Organization::new("acme ", "Acme")))]);
    let key = EntityKey::new("code", "ACME");

    let mut first: Organization = helper
        .get_by_key(&key, || Ok(cache.get("ACME").cloned()))
        .unwrap();
    assert_eq!(first.code, "ACME");
    first.name = "Changed".to_string();

    let second: Organization = helper
        .get_by_key(&key, || Ok(cache.get("ACME").cloned()))
        .unwrap();
    assert_eq!(second.name, "Acme");
    assert_eq!(cache["ACME"].code, "acme ");
}

#[test]
fn get_all_and_count_see_active_rows_in_insert_order() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    for (code, name) in [("B", "Beta"), ("A", "Alpha")] {
        dao.add(&mut Organization::new(code, name)).unwrap();
    }

    let codes: Vec<String> = dao.get_all().unwrap().into_iter().map(|org| org.code).collect();
    assert_eq!(codes, ["B", "A"]);
    assert_eq!(dao.count().unwrap(), 2);
}
