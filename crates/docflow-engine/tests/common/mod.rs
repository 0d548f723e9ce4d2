#![allow(dead_code)]

use docflow_core::model::{
    ActorIdentity, AuditAction, Document, DocumentId, DocumentStatus, Role, UserId,
};
use docflow_core::state_machine::WorkflowAction;
use docflow_engine::commands::documents::create_document;
use docflow_engine::DocumentWorkflowService;
use docflow_store::queries::{count_approval_steps, count_audit_logs};
use docflow_store::{db, SqliteRepo, StoreConfig};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestDb {
    pub dir: TempDir,
    pub path: PathBuf,
    pub owner: UserId,
    pub manager: UserId,
    pub employee: UserId,
    pub admin: UserId,
}

impl TestDb {
    pub fn connect(&self) -> Connection {
        open(&self.path, Duration::from_secs(5))
    }

    pub fn connect_with_timeout(&self, busy_timeout: Duration) -> Connection {
        open(&self.path, busy_timeout)
    }

    pub fn identity(&self, user: UserId) -> ActorIdentity {
        SqliteRepo::load_identity(&self.connect(), user)
            .unwrap()
            .expect("seeded user")
    }
}

fn open(path: &Path, busy_timeout: Duration) -> Connection {
    db::open_configured(path, &StoreConfig { busy_timeout }).unwrap()
}

/// Fresh on-disk database with four users:
/// owner (Employee), manager (Manager), employee (Employee), admin (superuser)
pub fn setup_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docflow.db");
    let conn = open(&path, Duration::from_secs(5));

    let owner = SqliteRepo::insert_user(&conn, "owner", false).unwrap();
    let manager = SqliteRepo::insert_user(&conn, "manager", false).unwrap();
    let employee = SqliteRepo::insert_user(&conn, "employee", false).unwrap();
    let admin = SqliteRepo::insert_user(&conn, "admin", true).unwrap();
    SqliteRepo::assign_role(&conn, owner, Role::Employee).unwrap();
    SqliteRepo::assign_role(&conn, manager, Role::Manager).unwrap();
    SqliteRepo::assign_role(&conn, employee, Role::Employee).unwrap();

    TestDb {
        dir,
        path,
        owner,
        manager,
        employee,
        admin,
    }
}

pub fn create_draft(db: &TestDb, title: &str) -> Document {
    create_document(&mut db.connect(), db.owner, title, "body").unwrap()
}

/// A document already moved to SUBMITTED by its owner
pub fn create_submitted(db: &TestDb, service: &DocumentWorkflowService) -> Document {
    let draft = create_draft(db, "Quarterly report");
    service
        .perform(
            &mut db.connect(),
            draft.id,
            WorkflowAction::Submit,
            &db.identity(db.owner),
        )
        .unwrap()
}

pub fn status_of(db: &TestDb, id: DocumentId) -> DocumentStatus {
    SqliteRepo::get_document(&db.connect(), id)
        .unwrap()
        .unwrap()
        .status
}

pub fn approval_steps(db: &TestDb, id: DocumentId) -> u64 {
    count_approval_steps(&db.connect(), id).unwrap()
}

pub fn audit_entries(db: &TestDb, id: DocumentId, action: AuditAction) -> u64 {
    count_audit_logs(&db.connect(), id, Some(action)).unwrap()
}
