//! Document commands outside the approval transitions
//!
//! Creating a document and editing a draft. Both run in one exclusive
//! transaction; creation also appends the `DOCUMENT_CREATED` audit entry.

use docflow_core::errors::WorkflowError;
use docflow_core::model::document::MAX_TITLE_LEN;
use docflow_core::model::{AuditAction, Document, DocumentId, DocumentStatus, UserId};
use docflow_core::{log_op_end, log_op_error, log_op_start};
use docflow_core_types::schema::{OP_CREATE_DOCUMENT, OP_UPDATE_DRAFT};
use docflow_store::atomic::{load_document_exclusive, run_atomic};
use docflow_store::SqliteRepo;
use rusqlite::Connection;
use std::time::Instant;

/// Partial edit of a draft; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Trimmed title, or `Validation` when blank or too long
pub fn validate_title(title: &str) -> Result<String, WorkflowError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::Validation {
            field: "title",
            reason: "Title cannot be empty".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(WorkflowError::Validation {
            field: "title",
            reason: format!("Title exceeds {} characters", MAX_TITLE_LEN),
        });
    }
    Ok(trimmed.to_string())
}

/// Create a DRAFT document owned by `owner_id`
///
/// # Errors
///
/// - `Validation` for a bad title
/// - `ActorNotFound` if the owner does not exist
/// - `EngineExecution` for storage failures
pub fn create_document(
    conn: &mut Connection,
    owner_id: UserId,
    title: &str,
    content: &str,
) -> Result<Document, WorkflowError> {
    let start = Instant::now();
    log_op_start!(OP_CREATE_DOCUMENT, actor_id = owner_id.get());

    let result = validate_title(title).and_then(|title| {
        run_atomic(conn, |tx| {
            if SqliteRepo::load_identity(tx, owner_id)?.is_none() {
                return Err(WorkflowError::ActorNotFound { actor_id: owner_id });
            }
            let document = SqliteRepo::insert_document(tx, owner_id, &title, content)?;
            SqliteRepo::insert_audit_log(
                tx,
                AuditAction::DocumentCreated,
                Some(owner_id),
                Some(document.id),
                &serde_json::json!({ "document_id": document.id.get() }),
            )?;
            Ok(document)
        })
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(document) => {
            log_op_end!(
                OP_CREATE_DOCUMENT,
                duration_ms = duration_ms,
                document_id = document.id.get()
            );
        }
        Err(err) => {
            log_op_error!(OP_CREATE_DOCUMENT, err, duration_ms = duration_ms);
        }
    }
    result
}

/// Edit title and/or content of a draft
///
/// Only the owner may edit, and only while the document is DRAFT. The
/// status is never touched and no audit entry is written.
///
/// # Errors
///
/// - `DocumentNotFound`, `PermissionViolation`, `InvalidTransition`
/// - `Validation` for a bad title
/// - `EngineExecution` for storage failures
pub fn update_draft(
    conn: &mut Connection,
    document_id: DocumentId,
    actor_id: UserId,
    changes: &DraftChanges,
) -> Result<Document, WorkflowError> {
    let start = Instant::now();
    log_op_start!(
        OP_UPDATE_DRAFT,
        document_id = document_id.get(),
        actor_id = actor_id.get()
    );

    let result = run_atomic(conn, |tx| {
        let mut document = load_document_exclusive(tx, document_id)?
            .ok_or(WorkflowError::DocumentNotFound { document_id })?;

        if !document.is_owned_by(actor_id) {
            return Err(WorkflowError::permission("Only the document owner can edit"));
        }
        if document.status != DocumentStatus::Draft {
            return Err(WorkflowError::invalid_transition(
                "Only draft documents can be edited",
            ));
        }

        if let Some(title) = &changes.title {
            document.title = validate_title(title)?;
        }
        if let Some(content) = &changes.content {
            document.content = content.clone();
        }

        document.updated_at =
            SqliteRepo::update_document_body(tx, document.id, &document.title, &document.content)?;
        Ok(document)
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(
                OP_UPDATE_DRAFT,
                duration_ms = duration_ms,
                document_id = document_id.get()
            );
        }
        Err(err) => {
            log_op_error!(
                OP_UPDATE_DRAFT,
                err,
                duration_ms = duration_ms,
                document_id = document_id.get()
            );
        }
    }
    result
}
