//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run one add/update/delete/restore cycle against an in-memory database
//!   to verify `daokit_core` wiring end to end.
//! - Keep output deterministic apart from generated ids and timestamps.
//!
//! Usage: `daokit_cli [LOG_DIR]`. When an absolute `LOG_DIR` is given, engine
//! events are written there at the default level.

use daokit_core::{
    default_log_level, init_logging, open_db_in_memory, CodeDao, Dao, DaoHelper, Member,
    MemberDao, Organization, OrganizationDao, ParentCodeDao, SoftDeleteDao,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("daokit_cli logging disabled: {err}");
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("daokit_cli failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("daokit_core version={}", daokit_core::core_version());

    let conn = open_db_in_memory()?;
    let helper = DaoHelper::system();
    let organizations = OrganizationDao::new(&conn, helper.clone());
    let members = MemberDao::new(&conn, helper);

    let mut org = Organization::new("acme", "Acme Corp");
    let created = organizations.add(&mut org)?;
    let org_id = org.id.ok_or("organization id was not assigned")?;
    println!("add organization code={} create_time={created}", org.code);

    let mut member = Member::new(Some(org_id), "m-01", "Ana");
    members.add_or_update_by_parent_code(&mut member)?;
    let mut renamed = Member::new(Some(org_id), "M-01", "Ana Lima");
    let modified = members.add_or_update_by_parent_code(&mut renamed)?;
    let stored = members.get_by_parent_code(org_id, "M-01")?;
    println!(
        "upsert member code={} name={} modify_time={modified}",
        stored.code, stored.name
    );

    let deleted = organizations.delete(org_id)?;
    println!(
        "delete organization delete_time={deleted} visible={}",
        organizations.exist_non_deleted(org_id)?
    );
    organizations.restore(org_id)?;
    let restored = organizations.get_by_code("ACME")?;
    println!(
        "restore organization name={} deleted={}",
        restored.name,
        restored.timestamps.is_deleted()
    );

    info!("event=cli_cycle module=cli status=ok organization_id={org_id}");
    Ok(())
}
