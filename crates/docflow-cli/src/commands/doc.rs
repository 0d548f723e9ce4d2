//! Document commands
//!
//! Usage:
//!   docflow doc create --as <USER> --title <TITLE> [--content <TEXT>]
//!   docflow doc edit <ID> --as <USER> [--title <TITLE>] [--content <TEXT>]
//!   docflow doc submit|approve|reject <ID> --as <USER> [--correlation-id <ID>] [--metrics]
//!   docflow doc show <ID> --as <USER> [--json]
//!   docflow doc list --as <USER> [--json]

use super::{print_json, require, resolve_identity, resolve_user, CommandResult, Runtime};
use clap::{Args, Subcommand};
use docflow_core::metrics::InMemoryMetrics;
use docflow_core::model::{Document, DocumentId};
use docflow_core::state_machine::WorkflowAction;
use docflow_core_types::CorrelationId;
use docflow_engine::commands::documents::DraftChanges;
use docflow_engine::{apply_engine_command, DocumentWorkflowService, EngineCommand};
use docflow_store::{queries, SqliteRepo};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct DocArgs {
    #[command(subcommand)]
    pub command: DocCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocCommand {
    /// Create a draft document
    Create(CreateArgs),
    /// Edit the title or content of a draft
    Edit(EditArgs),
    /// Submit a draft for review
    Submit(TransitionArgs),
    /// Approve a submitted document
    Approve(TransitionArgs),
    /// Reject a submitted document
    Reject(TransitionArgs),
    /// Show a document with its approval step and audit trail
    Show(ShowArgs),
    /// List documents owned by a user
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Acting username (becomes the owner)
    #[arg(long = "as")]
    pub actor: String,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub content: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: i64,

    #[arg(long = "as")]
    pub actor: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Debug, Args)]
pub struct TransitionArgs {
    pub id: i64,

    #[arg(long = "as")]
    pub actor: String,

    /// Reuse a caller-supplied correlation id
    #[arg(long)]
    pub correlation_id: Option<String>,

    /// Print transition counters and latency after the call
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,

    /// Owner, Manager or Admin username
    #[arg(long = "as")]
    pub actor: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long = "as")]
    pub actor: String,

    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DocArgs, runtime: &Runtime) -> CommandResult {
    match args.command {
        DocCommand::Create(create) => execute_create(create, runtime),
        DocCommand::Edit(edit) => execute_edit(edit, runtime),
        DocCommand::Submit(t) => execute_transition(WorkflowAction::Submit, t, runtime),
        DocCommand::Approve(t) => execute_transition(WorkflowAction::Approve, t, runtime),
        DocCommand::Reject(t) => execute_transition(WorkflowAction::Reject, t, runtime),
        DocCommand::Show(show) => execute_show(show, runtime),
        DocCommand::List(list) => execute_list(list, runtime),
    }
}

fn service(runtime: &Runtime) -> Result<DocumentWorkflowService, Box<dyn std::error::Error>> {
    Ok(DocumentWorkflowService::new().with_source(runtime.config.source()?))
}

fn execute_create(args: CreateArgs, runtime: &Runtime) -> CommandResult {
    let mut conn = runtime.connect_existing()?;
    let owner_id = resolve_user(&conn, &args.actor)?;

    let cmd = EngineCommand::CreateDocument {
        owner_id,
        title: args.title,
        content: args.content,
    };
    let result = apply_engine_command(cmd, &mut conn, &service(runtime)?)?;
    let document = result.document();
    println!(
        "✓ Created document {} \"{}\" [{}]",
        document.id, document.title, document.status
    );
    Ok(())
}

fn execute_edit(args: EditArgs, runtime: &Runtime) -> CommandResult {
    if args.title.is_none() && args.content.is_none() {
        return Err("nothing to edit: pass --title and/or --content".into());
    }
    let mut conn = runtime.connect_existing()?;
    let actor_id = resolve_user(&conn, &args.actor)?;

    let cmd = EngineCommand::UpdateDraft {
        document_id: DocumentId(args.id),
        actor_id,
        changes: DraftChanges {
            title: args.title,
            content: args.content,
        },
    };
    let result = apply_engine_command(cmd, &mut conn, &service(runtime)?)?;
    println!("✓ Updated document {}", result.document().id);
    Ok(())
}

fn execute_transition(
    action: WorkflowAction,
    args: TransitionArgs,
    runtime: &Runtime,
) -> CommandResult {
    let mut conn = runtime.connect_existing()?;
    let actor_id = resolve_user(&conn, &args.actor)?;

    let metrics = Arc::new(InMemoryMetrics::new());
    let service = service(runtime)?.with_metrics(metrics.clone());

    let cmd = EngineCommand::Transition {
        document_id: DocumentId(args.id),
        action,
        actor_id,
        correlation_id: args.correlation_id.as_deref().map(CorrelationId::from_header),
    };
    let outcome = apply_engine_command(cmd, &mut conn, &service);

    if args.metrics {
        print_json(&metrics.snapshot())?;
    }

    let result = outcome?;
    let document = result.document();
    println!(
        "✓ {} document {}: now {}",
        action, document.id, document.status
    );
    Ok(())
}

fn execute_show(args: ShowArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect_existing()?;
    let viewer = resolve_identity(&conn, &args.actor)?;
    let document_id = DocumentId(args.id);
    let document = SqliteRepo::get_document(&conn, document_id)?
        .ok_or_else(|| format!("document not found: {}", document_id))?;
    require(
        viewer.can_view_document(document.owner_id),
        &args.actor,
        "view this document",
    )?;
    let steps = queries::approval_steps_for_document(&conn, document_id)?;
    let logs = queries::audit_logs_for_document(&conn, document_id)?;

    if args.json {
        return print_json(&json!({
            "document": document,
            "approval_steps": steps,
            "audit_logs": logs,
        }));
    }

    print_document(&document);
    for step in &steps {
        let decided_by = step
            .decided_by
            .map(|u| u.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  decision: {} by {} at {}",
            step.status,
            decided_by,
            step.decided_at.to_rfc3339()
        );
    }
    println!("  audit:");
    for log in &logs {
        println!("    {} {}", log.created_at.to_rfc3339(), log.action);
    }
    Ok(())
}

fn execute_list(args: ListArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect_existing()?;
    let owner_id = resolve_user(&conn, &args.actor)?;
    let documents = queries::list_documents_for_owner(&conn, owner_id)?;

    if args.json {
        return print_json(&documents);
    }
    if documents.is_empty() {
        println!("No documents.");
    }
    for document in &documents {
        print_document(document);
    }
    Ok(())
}

pub(crate) fn print_document(document: &Document) {
    println!(
        "#{} {} [{}] owner={} updated={}",
        document.id,
        document.title,
        document.status,
        document.owner_id,
        document.updated_at.to_rfc3339()
    );
}
