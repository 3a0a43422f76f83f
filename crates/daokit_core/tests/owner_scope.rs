mod common;

use daokit_core::{Attachment, AttachmentDao, Dao, OwnerDao, OwnerRef, SoftDeleteDao};
use uuid::Uuid;

fn avatar_of(owner_id: Uuid) -> OwnerRef {
    OwnerRef::new("member", "avatar", owner_id)
}

fn attach(dao: &AttachmentDao<'_>, owner: &OwnerRef, file_name: &str) -> Uuid {
    let mut attachment = Attachment::new(owner.clone(), file_name, 128);
    dao.add(&mut attachment).unwrap();
    attachment.id.unwrap()
}

#[test]
fn owner_scope_counts_and_lists_only_its_rows() {
    let conn = common::open();
    let dao = AttachmentDao::new(&conn, common::helper());
    let owner = avatar_of(Uuid::from_u128(7));
    let other_property = OwnerRef::new("member", "resume", Uuid::from_u128(7));
    attach(&dao, &owner, "a.png");
    attach(&dao, &owner, "b.png");
    attach(&dao, &other_property, "cv.pdf");

    assert_eq!(dao.count_for_owner(&owner).unwrap(), 2);
    let names: Vec<String> = dao
        .get_for_owner(&owner)
        .unwrap()
        .into_iter()
        .map(|attachment| attachment.file_name)
        .collect();
    assert_eq!(names, ["a.png", "b.png"]);
    assert_eq!(dao.count_for_owner(&other_property).unwrap(), 1);
}

#[test]
fn bulk_lifecycle_for_owner() {
    let conn = common::open();
    let dao = AttachmentDao::new(&conn, common::helper());
    let owner = avatar_of(Uuid::from_u128(7));
    let bystander = avatar_of(Uuid::from_u128(8));
    let first = attach(&dao, &owner, "a.png");
    attach(&dao, &owner, "b.png");
    let kept = attach(&dao, &bystander, "c.png");

    assert_eq!(dao.delete_for_owner(&owner).unwrap(), 2);
    assert_eq!(dao.count_for_owner(&owner).unwrap(), 0);
    assert!(dao.get_deleted(first).unwrap().timestamps.is_deleted());
    assert!(dao.exist_non_deleted(kept).unwrap());

    assert_eq!(dao.restore_for_owner(&owner).unwrap(), 2);
    assert_eq!(dao.count_for_owner(&owner).unwrap(), 2);

    // Purge only reaches soft-deleted rows.
    assert_eq!(dao.purge_for_owner(&owner).unwrap(), 0);
    dao.delete(first).unwrap();
    assert_eq!(dao.purge_for_owner(&owner).unwrap(), 1);
    assert!(dao.get_including_deleted(first).is_err());

    assert_eq!(dao.erase_for_owner(&owner).unwrap(), 1);
    assert_eq!(dao.count_for_owner(&owner).unwrap(), 0);
    assert_eq!(dao.count().unwrap(), 1);
}

#[test]
fn empty_owner_scope_reports_zero_instead_of_not_found() {
    let conn = common::open();
    let dao = AttachmentDao::new(&conn, common::helper());
    let nobody = avatar_of(Uuid::from_u128(99));

    assert_eq!(dao.count_for_owner(&nobody).unwrap(), 0);
    assert!(dao.get_for_owner(&nobody).unwrap().is_empty());
    assert_eq!(dao.delete_for_owner(&nobody).unwrap(), 0);
    assert_eq!(dao.restore_for_owner(&nobody).unwrap(), 0);
    assert_eq!(dao.purge_for_owner(&nobody).unwrap(), 0);
    assert_eq!(dao.erase_for_owner(&nobody).unwrap(), 0);
}
