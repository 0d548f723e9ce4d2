//! Audit log listing, newest first
//!
//! Usage: docflow audit --as <USER> [--action <ACTION>] [--actor <USER>] [--document <ID>]
//!                      [--since <RFC3339>] [--limit <N>] [--json]
//!
//! The full log is admin-only. With `--document`, the owner and any Manager
//! may read that document's trail.

use super::{print_json, require, resolve_identity, resolve_user, CommandResult, Runtime};
use chrono::{DateTime, Utc};
use clap::Args;
use docflow_core::model::{AuditAction, DocumentId};
use docflow_store::queries::{self, AuditLogFilter};
use docflow_store::SqliteRepo;

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Viewing username
    #[arg(long = "as")]
    pub viewer: String,

    /// DOCUMENT_CREATED, DOCUMENT_SUBMITTED, DOCUMENT_APPROVED or DOCUMENT_REJECTED
    #[arg(long)]
    pub action: Option<AuditAction>,

    /// Username of the acting user
    #[arg(long)]
    pub actor: Option<String>,

    #[arg(long)]
    pub document: Option<i64>,

    /// Only entries at or after this instant
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: AuditArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect_existing()?;
    let viewer = resolve_identity(&conn, &args.viewer)?;

    let document_owner = match args.document {
        Some(id) if !viewer.can_audit() => SqliteRepo::get_document(&conn, DocumentId(id))?
            .map(|document| document.owner_id),
        _ => None,
    };
    let allowed = viewer.can_audit()
        || document_owner.is_some_and(|owner| viewer.can_view_document(owner));
    require(allowed, &args.viewer, "read this audit log")?;

    let actor_id = match &args.actor {
        Some(username) => Some(resolve_user(&conn, username)?),
        None => None,
    };
    let filter = AuditLogFilter {
        action: args.action,
        actor_id,
        document_id: args.document.map(DocumentId),
        since: args.since,
        limit: args.limit,
    };
    let logs = queries::list_audit_logs(&conn, &filter)?;

    if args.json {
        return print_json(&logs);
    }
    for log in &logs {
        let document = log
            .document_id
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let actor = log
            .actor_id
            .map(|u| u.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {} document={} actor={}",
            log.created_at.to_rfc3339(),
            log.action,
            document,
            actor
        );
    }
    Ok(())
}
