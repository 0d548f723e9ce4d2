//! SQLite repository implementation
//!
//! Row-level reads and writes for users, documents, approval steps and the
//! audit log. Every function takes a `&Connection`; pass `&tx` to run inside
//! a transaction.

use crate::errors::{column_error, from_rusqlite, from_rusqlite_in, json_error, Result};
use chrono::{DateTime, SubsecRound, Utc};
use docflow_core::errors::{ExError, ExErrorKind};
use docflow_core::model::{
    ActorIdentity, ApprovalStep, AuditAction, AuditLog, Document, DocumentId, DocumentStatus,
    Role, UserId,
};
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

pub(crate) const DOCUMENT_COLUMNS: &str =
    "id, title, content, status, owner_id, created_at, updated_at";
pub(crate) const APPROVAL_STEP_COLUMNS: &str = "id, document_id, decided_by, status, decided_at";
pub(crate) const AUDIT_LOG_COLUMNS: &str =
    "id, action, actor_id, document_id, metadata, created_at";

/// Current time at the millisecond precision the store keeps
fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Read an epoch-millis column; out-of-range values are a row error
pub(crate) fn datetime_column(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(index)?;
    DateTime::from_timestamp_millis(ms).ok_or_else(|| {
        column_error(
            index,
            ExError::new(ExErrorKind::Serialization)
                .with_op("datetime_column")
                .with_message(format!("timestamp {} ms is out of range", ms)),
        )
    })
}

pub(crate) fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let status: String = row.get(3)?;
    Ok(Document {
        id: DocumentId(row.get(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        status: status.parse().map_err(|e| column_error(3, e))?,
        owner_id: UserId(row.get(4)?),
        created_at: datetime_column(row, 5)?,
        updated_at: datetime_column(row, 6)?,
    })
}

pub(crate) fn approval_step_from_row(row: &Row<'_>) -> rusqlite::Result<ApprovalStep> {
    let status: String = row.get(3)?;
    Ok(ApprovalStep {
        id: row.get(0)?,
        document_id: DocumentId(row.get(1)?),
        decided_by: row.get::<_, Option<i64>>(2)?.map(UserId),
        status: status.parse().map_err(|e| column_error(3, e))?,
        decided_at: datetime_column(row, 4)?,
    })
}

pub(crate) fn audit_log_from_row(row: &Row<'_>) -> rusqlite::Result<AuditLog> {
    let action: String = row.get(1)?;
    let metadata: String = row.get(4)?;
    Ok(AuditLog {
        id: row.get(0)?,
        action: action.parse().map_err(|e| column_error(1, e))?,
        actor_id: row.get::<_, Option<i64>>(2)?.map(UserId),
        document_id: row.get::<_, Option<i64>>(3)?.map(DocumentId),
        metadata: serde_json::from_str(&metadata)
            .map_err(|e| column_error(4, json_error("audit_log_from_row", e)))?,
        created_at: datetime_column(row, 5)?,
    })
}

/// SQLite repository for workflow records
pub struct SqliteRepo;

impl SqliteRepo {
    // ===== Users and roles =====

    /// Create a user and return its id
    pub fn insert_user(conn: &Connection, username: &str, is_superuser: bool) -> Result<UserId> {
        conn.execute(
            "INSERT INTO users (username, is_superuser, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![username, is_superuser, Utc::now().timestamp_millis()],
        )
        .map_err(from_rusqlite_in("insert_user"))?;

        Ok(UserId(conn.last_insert_rowid()))
    }

    pub fn find_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserId>> {
        conn.query_row(
            "SELECT id FROM users WHERE username = ?",
            [username],
            |row| row.get(0).map(UserId),
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Grant a role; granting twice is a no-op
    pub fn assign_role(conn: &Connection, user_id: UserId, role: Role) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?1, ?2)",
            rusqlite::params![user_id.get(), role.as_str()],
        )
        .map_err(from_rusqlite_in("assign_role"))?;
        Ok(())
    }

    pub fn revoke_role(conn: &Connection, user_id: UserId, role: Role) -> Result<()> {
        conn.execute(
            "DELETE FROM user_roles WHERE user_id = ?1 AND role = ?2",
            rusqlite::params![user_id.get(), role.as_str()],
        )
        .map_err(from_rusqlite_in("revoke_role"))?;
        Ok(())
    }

    /// Current roles and superuser flag of a user
    pub fn load_identity(conn: &Connection, user_id: UserId) -> Result<Option<ActorIdentity>> {
        let is_superuser: Option<bool> = conn
            .query_row(
                "SELECT is_superuser FROM users WHERE id = ?",
                [user_id.get()],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        let Some(is_superuser) = is_superuser else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare("SELECT role FROM user_roles WHERE user_id = ? ORDER BY role")
            .map_err(from_rusqlite)?;
        let roles: BTreeSet<Role> = stmt
            .query_map([user_id.get()], |row| {
                let role: String = row.get(0)?;
                role.parse::<Role>().map_err(|e| column_error(0, e))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<_, _>>()
            .map_err(from_rusqlite)?;

        Ok(Some(ActorIdentity {
            actor_id: user_id,
            roles,
            is_superuser,
        }))
    }

    // ===== Documents =====

    /// Insert a new DRAFT document
    pub fn insert_document(
        conn: &Connection,
        owner_id: UserId,
        title: &str,
        content: &str,
    ) -> Result<Document> {
        let now = now_millis();
        conn.execute(
            "INSERT INTO documents (title, content, status, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![
                title,
                content,
                DocumentStatus::Draft.as_str(),
                owner_id.get(),
                now.timestamp_millis()
            ],
        )
        .map_err(from_rusqlite_in("insert_document"))?;

        Ok(Document {
            id: DocumentId(conn.last_insert_rowid()),
            title: title.to_string(),
            content: content.to_string(),
            status: DocumentStatus::Draft,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a document by id
    pub fn get_document(conn: &Connection, document_id: DocumentId) -> Result<Option<Document>> {
        let sql = format!("SELECT {} FROM documents WHERE id = ?", DOCUMENT_COLUMNS);
        conn.query_row(&sql, [document_id.get()], document_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    pub fn update_document_status(
        conn: &Connection,
        document_id: DocumentId,
        status: DocumentStatus,
    ) -> Result<DateTime<Utc>> {
        let now = now_millis();
        conn.execute(
            "UPDATE documents SET status = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![status.as_str(), now.timestamp_millis(), document_id.get()],
        )
        .map_err(from_rusqlite_in("update_document_status"))?;
        Ok(now)
    }

    /// Overwrite title and content; status is left alone
    pub fn update_document_body(
        conn: &Connection,
        document_id: DocumentId,
        title: &str,
        content: &str,
    ) -> Result<DateTime<Utc>> {
        let now = now_millis();
        conn.execute(
            "UPDATE documents SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            rusqlite::params![title, content, now.timestamp_millis(), document_id.get()],
        )
        .map_err(from_rusqlite_in("update_document_body"))?;
        Ok(now)
    }

    // ===== Approval steps =====

    /// Record the decision on a document
    ///
    /// Fails with `ConstraintViolation` if the document was already decided.
    pub fn insert_approval_step(
        conn: &Connection,
        document_id: DocumentId,
        decided_by: UserId,
        status: DocumentStatus,
    ) -> Result<ApprovalStep> {
        let now = now_millis();
        conn.execute(
            "INSERT INTO approval_steps (document_id, decided_by, status, decided_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                document_id.get(),
                decided_by.get(),
                status.as_str(),
                now.timestamp_millis()
            ],
        )
        .map_err(|e| {
            from_rusqlite_in("insert_approval_step")(e).with_entity_id(document_id.to_string())
        })?;

        Ok(ApprovalStep {
            id: conn.last_insert_rowid(),
            document_id,
            decided_by: Some(decided_by),
            status,
            decided_at: now,
        })
    }

    // ===== Audit log =====

    /// Append an audit entry
    pub fn insert_audit_log(
        conn: &Connection,
        action: AuditAction,
        actor_id: Option<UserId>,
        document_id: Option<DocumentId>,
        metadata: &serde_json::Value,
    ) -> Result<AuditLog> {
        let now = now_millis();
        let metadata_json =
            serde_json::to_string(metadata).map_err(|e| json_error("insert_audit_log", e))?;
        conn.execute(
            "INSERT INTO audit_logs (action, actor_id, document_id, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                action.as_str(),
                actor_id.map(UserId::get),
                document_id.map(DocumentId::get),
                metadata_json,
                now.timestamp_millis()
            ],
        )
        .map_err(from_rusqlite_in("insert_audit_log"))?;

        Ok(AuditLog {
            id: conn.last_insert_rowid(),
            action,
            actor_id,
            document_id,
            metadata: metadata.clone(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use docflow_core::errors::ExErrorKind;

    fn setup_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_document_round_trip() {
        let conn = setup_db();
        let owner = SqliteRepo::insert_user(&conn, "alice", false).unwrap();

        let created = SqliteRepo::insert_document(&conn, owner, "Budget", "Q3 numbers").unwrap();
        let loaded = SqliteRepo::get_document(&conn, created.id).unwrap().unwrap();

        assert_eq!(loaded.title, "Budget");
        assert_eq!(loaded.status, DocumentStatus::Draft);
        assert_eq!(loaded.owner_id, owner);
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            created.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_missing_document_is_none() {
        let conn = setup_db();
        assert!(SqliteRepo::get_document(&conn, DocumentId(77)).unwrap().is_none());
    }

    #[test]
    fn test_identity_reflects_current_roles() {
        let conn = setup_db();
        let user = SqliteRepo::insert_user(&conn, "mallory", false).unwrap();
        SqliteRepo::assign_role(&conn, user, Role::Manager).unwrap();
        SqliteRepo::assign_role(&conn, user, Role::Manager).unwrap();

        let identity = SqliteRepo::load_identity(&conn, user).unwrap().unwrap();
        assert!(identity.has_role(Role::Manager));
        assert_eq!(identity.roles.len(), 1);

        SqliteRepo::revoke_role(&conn, user, Role::Manager).unwrap();
        let identity = SqliteRepo::load_identity(&conn, user).unwrap().unwrap();
        assert!(identity.roles.is_empty());

        assert!(SqliteRepo::load_identity(&conn, UserId(999)).unwrap().is_none());
    }

    #[test]
    fn test_second_approval_step_violates_uniqueness() {
        let conn = setup_db();
        let owner = SqliteRepo::insert_user(&conn, "alice", false).unwrap();
        let manager = SqliteRepo::insert_user(&conn, "bob", false).unwrap();
        let doc = SqliteRepo::insert_document(&conn, owner, "Budget", "").unwrap();

        SqliteRepo::insert_approval_step(&conn, doc.id, manager, DocumentStatus::Approved).unwrap();
        let err = SqliteRepo::insert_approval_step(&conn, doc.id, manager, DocumentStatus::Rejected)
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
        assert_eq!(err.entity_id(), Some(doc.id.to_string().as_str()));
    }

    #[test]
    fn test_approval_step_status_checked() {
        let conn = setup_db();
        let owner = SqliteRepo::insert_user(&conn, "alice", false).unwrap();
        let doc = SqliteRepo::insert_document(&conn, owner, "Budget", "").unwrap();

        let err = SqliteRepo::insert_approval_step(&conn, doc.id, owner, DocumentStatus::Submitted)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_audit_log_is_append_only() {
        let conn = setup_db();
        let owner = SqliteRepo::insert_user(&conn, "alice", false).unwrap();
        let doc = SqliteRepo::insert_document(&conn, owner, "Budget", "").unwrap();
        let entry = SqliteRepo::insert_audit_log(
            &conn,
            AuditAction::DocumentCreated,
            Some(owner),
            Some(doc.id),
            &serde_json::json!({ "document_id": doc.id.get() }),
        )
        .unwrap();

        let update = conn.execute(
            "UPDATE audit_logs SET action = 'DOCUMENT_APPROVED' WHERE id = ?",
            [entry.id],
        );
        let delete = conn.execute("DELETE FROM audit_logs WHERE id = ?", [entry.id]);

        assert_eq!(
            crate::errors::from_rusqlite(update.unwrap_err()).kind(),
            ExErrorKind::ConstraintViolation
        );
        assert!(delete.is_err());
    }

    #[test]
    fn test_out_of_range_timestamp_is_serialization_error() {
        let conn = setup_db();
        let owner = SqliteRepo::insert_user(&conn, "alice", false).unwrap();
        conn.execute(
            "INSERT INTO documents (title, status, owner_id, created_at, updated_at)
             VALUES ('Skewed', 'DRAFT', ?1, ?2, 0)",
            rusqlite::params![owner.get(), i64::MAX],
        )
        .unwrap();
        let id = DocumentId(conn.last_insert_rowid());

        let err = SqliteRepo::get_document(&conn, id).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }

    #[test]
    fn test_corrupt_audit_metadata_is_serialization_error() {
        let conn = setup_db();
        let owner = SqliteRepo::insert_user(&conn, "alice", false).unwrap();
        let doc = SqliteRepo::insert_document(&conn, owner, "Budget", "").unwrap();
        conn.execute(
            "INSERT INTO audit_logs (action, actor_id, document_id, metadata, created_at)
             VALUES ('DOCUMENT_CREATED', ?1, ?2, '{not json', 0)",
            rusqlite::params![owner.get(), doc.id.get()],
        )
        .unwrap();

        let err = crate::queries::audit_logs_for_document(&conn, doc.id).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
