mod common;

use daokit_core::{
    Attachment, AttachmentDao, Dao, DaoError, FieldViolationKind, Label, LabelDao, Member,
    MemberDao, Organization, OrganizationDao, OwnerRef,
};
use uuid::Uuid;

fn field_violation(err: DaoError) -> (FieldViolationKind, String) {
    match err {
        DaoError::Field(violation) => (violation.kind, violation.target),
        other => panic!("expected field violation, got {other}"),
    }
}

fn seeded_organization(conn: &rusqlite::Connection) -> Uuid {
    let dao = OrganizationDao::new(conn, common::helper());
    let mut org = Organization::new("ACME", "Acme");
    dao.add(&mut org).unwrap();
    org.id.unwrap()
}

#[test]
fn overlong_code_is_too_long() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());

    let err = dao
        .add(&mut Organization::new("C".repeat(33), "Long"))
        .unwrap_err();

    let (kind, target) = field_violation(err);
    assert_eq!(kind, FieldViolationKind::TooLong);
    assert_eq!(target, "ck_organizations_code_length");
    assert_eq!(dao.count().unwrap(), 0);
}

#[test]
fn malformed_email_and_color_are_format_violations() {
    let conn = common::open();
    let org_id = seeded_organization(&conn);
    let members = MemberDao::new(&conn, common::helper());
    let labels = LabelDao::new(&conn, common::helper());

    let mut member = Member::new(Some(org_id), "M-1", "Ana");
    member.email = Some("not-an-email".to_string());
    let (kind, target) = field_violation(members.add(&mut member).unwrap_err());
    assert_eq!(kind, FieldViolationKind::MalformedFormat);
    assert_eq!(target, "ck_members_email_format");

    let mut label = Label::new("member", "VIP");
    label.color = Some("red".to_string());
    let (kind, target) = field_violation(labels.add(&mut label).unwrap_err());
    assert_eq!(kind, FieldViolationKind::MalformedFormat);
    assert_eq!(target, "ck_labels_color_format");
}

#[test]
fn negative_size_is_out_of_range() {
    let conn = common::open();
    let dao = AttachmentDao::new(&conn, common::helper());
    let owner = OwnerRef::new("member", "avatar", Uuid::from_u128(1));

    let err = dao.add(&mut Attachment::new(owner, "a.png", -1)).unwrap_err();

    let (kind, target) = field_violation(err);
    assert_eq!(kind, FieldViolationKind::OutOfRange);
    assert_eq!(target, "ck_attachments_size_bytes_range");
}

#[test]
fn missing_and_dangling_parent_references() {
    let conn = common::open();
    let dao = MemberDao::new(&conn, common::helper());

    let (kind, target) = field_violation(
        dao.add(&mut Member::new(None, "M-1", "Ana"))
            .unwrap_err(),
    );
    assert_eq!(kind, FieldViolationKind::NullRequired);
    assert_eq!(target, "members.organization_id");

    let (kind, _) = field_violation(
        dao.add(&mut Member::new(Some(Uuid::from_u128(404)), "M-1", "Ana"))
            .unwrap_err(),
    );
    assert_eq!(kind, FieldViolationKind::ForeignKey);
}

#[test]
fn unique_violation_is_duplicate_key_on_table() {
    let conn = common::open();
    let dao = OrganizationDao::new(&conn, common::helper());
    dao.add(&mut Organization::new("A", "Acme")).unwrap();

    match dao.add(&mut Organization::new("B", " Acme ")).unwrap_err() {
        DaoError::DuplicateKey { entity, key } => {
            assert_eq!(entity, "organizations");
            assert_eq!(key, "organizations.name");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(dao.count().unwrap(), 1);
}
