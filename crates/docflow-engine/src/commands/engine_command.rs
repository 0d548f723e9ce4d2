//! Engine-level commands: one enum, one dispatch function.

use crate::commands::documents::{create_document, update_draft, DraftChanges};
use crate::workflow_service::DocumentWorkflowService;
use docflow_core::errors::WorkflowError;
use docflow_core::execution::ExecutionContext;
use docflow_core::model::{Document, DocumentId, UserId};
use docflow_core::roles::RoleDirectory;
use docflow_core::state_machine::WorkflowAction;
use docflow_core_types::CorrelationId;
use docflow_store::SqliteRoleDirectory;
use rusqlite::Connection;

/// Engine-level commands that require I/O
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    CreateDocument {
        owner_id: UserId,
        title: String,
        content: String,
    },
    UpdateDraft {
        document_id: DocumentId,
        actor_id: UserId,
        changes: DraftChanges,
    },
    /// Submit, approve or reject; roles are resolved fresh from the store
    Transition {
        document_id: DocumentId,
        action: WorkflowAction,
        actor_id: UserId,
        correlation_id: Option<CorrelationId>,
    },
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    Created(Document),
    Updated(Document),
    Transitioned(Document),
}

impl EngineCommandResult {
    pub fn document(&self) -> &Document {
        match self {
            EngineCommandResult::Created(d)
            | EngineCommandResult::Updated(d)
            | EngineCommandResult::Transitioned(d) => d,
        }
    }
}

/// Apply an engine command
///
/// # Errors
///
/// Any `WorkflowError` raised by the underlying operation.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    service: &DocumentWorkflowService,
) -> Result<EngineCommandResult, WorkflowError> {
    match cmd {
        EngineCommand::CreateDocument {
            owner_id,
            title,
            content,
        } => create_document(conn, owner_id, &title, &content).map(EngineCommandResult::Created),

        EngineCommand::UpdateDraft {
            document_id,
            actor_id,
            changes,
        } => update_draft(conn, document_id, actor_id, &changes).map(EngineCommandResult::Updated),

        EngineCommand::Transition {
            document_id,
            action,
            actor_id,
            correlation_id,
        } => {
            let identity = SqliteRoleDirectory::new(conn).resolve(actor_id)?;
            let mut context = ExecutionContext::snapshot(&identity, service.source());
            if let Some(correlation_id) = correlation_id {
                context = context.with_correlation_id(correlation_id);
            }
            service
                .perform_with_context(conn, document_id, action, context)
                .map(EngineCommandResult::Transitioned)
        }
    }
}
