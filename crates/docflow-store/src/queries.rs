//! Read-only queries
//!
//! Listing and reporting reads. None of these take the write lock.

use crate::errors::{from_rusqlite, Result};
use crate::repo::sqlite_repo::{
    approval_step_from_row, audit_log_from_row, document_from_row, APPROVAL_STEP_COLUMNS,
    AUDIT_LOG_COLUMNS, DOCUMENT_COLUMNS,
};
use chrono::{DateTime, Utc};
use docflow_core::model::{
    ApprovalStep, AuditAction, AuditLog, Document, DocumentId, DocumentStatus, UserId,
};
use rusqlite::types::Value;
use rusqlite::Connection;
use serde::Serialize;

/// Number of audit entries shown on the dashboard
pub const DASHBOARD_RECENT_LOGS: usize = 10;

fn collect_rows<T, F>(conn: &Connection, sql: &str, params: &[Value], map: F) -> Result<Vec<T>>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), map)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

/// Documents owned by `owner`, most recently updated first
pub fn list_documents_for_owner(conn: &Connection, owner: UserId) -> Result<Vec<Document>> {
    let sql = format!(
        "SELECT {} FROM documents WHERE owner_id = ? ORDER BY updated_at DESC, id DESC",
        DOCUMENT_COLUMNS
    );
    collect_rows(conn, &sql, &[Value::Integer(owner.get())], document_from_row)
}

/// Submitted documents awaiting a decision, excluding the reviewer's own
pub fn review_queue(conn: &Connection, reviewer: UserId) -> Result<Vec<Document>> {
    let sql = format!(
        "SELECT {} FROM documents WHERE status = ? AND owner_id != ?
         ORDER BY updated_at DESC, id DESC",
        DOCUMENT_COLUMNS
    );
    collect_rows(
        conn,
        &sql,
        &[
            Value::Text(DocumentStatus::Submitted.as_str().to_string()),
            Value::Integer(reviewer.get()),
        ],
        document_from_row,
    )
}

pub fn approval_steps_for_document(
    conn: &Connection,
    document_id: DocumentId,
) -> Result<Vec<ApprovalStep>> {
    let sql = format!(
        "SELECT {} FROM approval_steps WHERE document_id = ? ORDER BY id",
        APPROVAL_STEP_COLUMNS
    );
    collect_rows(
        conn,
        &sql,
        &[Value::Integer(document_id.get())],
        approval_step_from_row,
    )
}

/// Audit trail of one document, oldest first
pub fn audit_logs_for_document(
    conn: &Connection,
    document_id: DocumentId,
) -> Result<Vec<AuditLog>> {
    let sql = format!(
        "SELECT {} FROM audit_logs WHERE document_id = ? ORDER BY created_at, id",
        AUDIT_LOG_COLUMNS
    );
    collect_rows(
        conn,
        &sql,
        &[Value::Integer(document_id.get())],
        audit_log_from_row,
    )
}

/// Filters for `list_audit_logs`; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub action: Option<AuditAction>,
    pub actor_id: Option<UserId>,
    pub document_id: Option<DocumentId>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Audit entries matching `filter`, newest first
pub fn list_audit_logs(conn: &Connection, filter: &AuditLogFilter) -> Result<Vec<AuditLog>> {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(action) = filter.action {
        clauses.push("action = ?");
        params.push(Value::Text(action.as_str().to_string()));
    }
    if let Some(actor_id) = filter.actor_id {
        clauses.push("actor_id = ?");
        params.push(Value::Integer(actor_id.get()));
    }
    if let Some(document_id) = filter.document_id {
        clauses.push("document_id = ?");
        params.push(Value::Integer(document_id.get()));
    }
    if let Some(since) = filter.since {
        clauses.push("created_at >= ?");
        params.push(Value::Integer(since.timestamp_millis()));
    }

    let mut sql = format!("SELECT {} FROM audit_logs", AUDIT_LOG_COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(limit as i64));
    }

    collect_rows(conn, &sql, &params, audit_log_from_row)
}

/// Number of approval steps recorded for a document (0 or 1)
pub fn count_approval_steps(conn: &Connection, document_id: DocumentId) -> Result<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM approval_steps WHERE document_id = ?",
        [document_id.get()],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

/// Number of audit entries for a document, optionally of one action
pub fn count_audit_logs(
    conn: &Connection,
    document_id: DocumentId,
    action: Option<AuditAction>,
) -> Result<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM audit_logs WHERE document_id = ?1 AND (?2 IS NULL OR action = ?2)",
        rusqlite::params![document_id.get(), action.map(|a| a.as_str())],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

/// Per-status document totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub draft: u64,
    pub submitted: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl StatusCounts {
    pub fn total(&self) -> u64 {
        self.draft + self.submitted + self.approved + self.rejected
    }

    fn slot(&mut self, status: DocumentStatus) -> &mut u64 {
        match status {
            DocumentStatus::Draft => &mut self.draft,
            DocumentStatus::Submitted => &mut self.submitted,
            DocumentStatus::Approved => &mut self.approved,
            DocumentStatus::Rejected => &mut self.rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub counts: StatusCounts,
    /// Submitted documents the viewer could review
    pub pending_for_viewer: u64,
    pub recent_activity: Vec<AuditLog>,
}

pub fn dashboard_summary(conn: &Connection, viewer: UserId) -> Result<DashboardSummary> {
    let mut counts = StatusCounts::default();
    let per_status = collect_rows(
        conn,
        "SELECT status, COUNT(*) FROM documents GROUP BY status",
        &[],
        |row| {
            let status: String = row.get(0)?;
            let count: u64 = row.get(1)?;
            Ok((status, count))
        },
    )?;
    for (status, count) in per_status {
        if let Ok(status) = status.parse::<DocumentStatus>() {
            *counts.slot(status) = count;
        }
    }

    let pending_for_viewer = conn
        .query_row(
            "SELECT COUNT(*) FROM documents WHERE status = ?1 AND owner_id != ?2",
            rusqlite::params![DocumentStatus::Submitted.as_str(), viewer.get()],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    let recent_activity = list_audit_logs(
        conn,
        &AuditLogFilter {
            limit: Some(DASHBOARD_RECENT_LOGS),
            ..AuditLogFilter::default()
        },
    )?;

    Ok(DashboardSummary {
        counts,
        pending_for_viewer,
        recent_activity,
    })
}
