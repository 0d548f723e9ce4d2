#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use docflow_core::errors::WorkflowError;
use docflow_core::model::{AuditAction, DocumentStatus, UserId};
use docflow_core::state_machine::WorkflowAction;
use docflow_core_types::CorrelationId;
use docflow_engine::commands::documents::{create_document, update_draft, DraftChanges};
use docflow_engine::{
    apply_engine_command, DocumentWorkflowService, EngineCommand, EngineCommandResult,
};
use docflow_store::queries::{audit_logs_for_document, count_audit_logs};

#[test]
fn test_create_document_writes_created_audit() {
    let db = setup_db();

    let doc = create_document(&mut db.connect(), db.owner, "  Expense claim  ", "Taxi").unwrap();

    assert_eq!(doc.title, "Expense claim");
    assert_eq!(doc.status, DocumentStatus::Draft);
    assert_eq!(doc.owner_id, db.owner);
    let trail = audit_logs_for_document(&db.connect(), doc.id).unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::DocumentCreated);
    assert_eq!(trail[0].actor_id, Some(db.owner));
}

#[test]
fn test_create_document_validation() {
    let db = setup_db();

    let blank = create_document(&mut db.connect(), db.owner, "   ", "").unwrap_err();
    assert!(matches!(blank, WorkflowError::Validation { field: "title", .. }));

    let long = create_document(&mut db.connect(), db.owner, &"t".repeat(256), "").unwrap_err();
    assert!(matches!(long, WorkflowError::Validation { .. }));

    let ghost = create_document(&mut db.connect(), UserId(777), "Orphan", "").unwrap_err();
    assert!(matches!(ghost, WorkflowError::ActorNotFound { .. }));
}

#[test]
fn test_update_draft_rules() {
    let db = setup_db();
    let service = DocumentWorkflowService::new();
    let draft = create_draft(&db, "Original");

    // Owner edits title and content
    let edited = update_draft(
        &mut db.connect(),
        draft.id,
        db.owner,
        &DraftChanges {
            title: Some("Revised".to_string()),
            content: Some("New body".to_string()),
        },
    )
    .unwrap();
    assert_eq!(edited.title, "Revised");
    assert_eq!(edited.content, "New body");
    assert_eq!(edited.status, DocumentStatus::Draft);
    assert_eq!(count_audit_logs(&db.connect(), draft.id, None).unwrap(), 1);

    // Someone else may not edit
    let err = update_draft(
        &mut db.connect(),
        draft.id,
        db.manager,
        &DraftChanges {
            content: Some("hijack".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, WorkflowError::PermissionViolation { .. }));

    // Submitted documents are frozen
    service
        .perform(
            &mut db.connect(),
            draft.id,
            WorkflowAction::Submit,
            &db.identity(db.owner),
        )
        .unwrap();
    let err = update_draft(
        &mut db.connect(),
        draft.id,
        db.owner,
        &DraftChanges {
            title: Some("Too late".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    assert_eq!(status_of(&db, draft.id), DocumentStatus::Submitted);
}

#[test]
fn test_engine_command_dispatch() {
    let db = setup_db();
    let service = DocumentWorkflowService::new();
    let mut conn = db.connect();

    let created = apply_engine_command(
        EngineCommand::CreateDocument {
            owner_id: db.owner,
            title: "Via command".to_string(),
            content: String::new(),
        },
        &mut conn,
        &service,
    )
    .unwrap();
    let id = created.document().id;
    assert!(matches!(created, EngineCommandResult::Created(_)));

    let updated = apply_engine_command(
        EngineCommand::UpdateDraft {
            document_id: id,
            actor_id: db.owner,
            changes: DraftChanges {
                content: Some("filled in".to_string()),
                ..Default::default()
            },
        },
        &mut conn,
        &service,
    )
    .unwrap();
    assert_eq!(updated.document().content, "filled in");

    for (action, actor) in [
        (WorkflowAction::Submit, db.owner),
        (WorkflowAction::Approve, db.manager),
    ] {
        let result = apply_engine_command(
            EngineCommand::Transition {
                document_id: id,
                action,
                actor_id: actor,
                correlation_id: Some(CorrelationId::from_header("cmd-1")),
            },
            &mut conn,
            &service,
        )
        .unwrap();
        assert!(matches!(result, EngineCommandResult::Transitioned(_)));
    }
    assert_eq!(status_of(&db, id), DocumentStatus::Approved);

    let trail = audit_logs_for_document(&conn, id).unwrap();
    assert_eq!(trail.last().unwrap().metadata["correlation_id"], "cmd-1");

    let unknown = apply_engine_command(
        EngineCommand::Transition {
            document_id: id,
            action: WorkflowAction::Reject,
            actor_id: UserId(31_337),
            correlation_id: None,
        },
        &mut conn,
        &service,
    )
    .unwrap_err();
    assert!(matches!(unknown, WorkflowError::ActorNotFound { .. }));
}
