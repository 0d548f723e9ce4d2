#![allow(clippy::unwrap_used, clippy::expect_used)]

use docflow_core::decision::{Decision, WorkflowEngine};
use docflow_core::effects::Effect;
use docflow_core::model::{AuditAction, DocumentStatus};
use docflow_core::state_machine::{
    evaluate_named, evaluate_transition, ActorContext, TransitionFailure, WorkflowAction,
};
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = DocumentStatus> {
    prop::sample::select(DocumentStatus::ALL.to_vec())
}

fn any_action() -> impl Strategy<Value = WorkflowAction> {
    prop::sample::select(WorkflowAction::ALL.to_vec())
}

fn any_actor() -> impl Strategy<Value = ActorContext> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(is_owner, is_manager, is_admin)| {
        ActorContext {
            is_owner,
            is_manager,
            is_admin,
        }
    })
}

fn assert_contract(decision: &Decision) {
    let allowed = decision.is_allowed();
    let complete = decision.next_status().is_some()
        && decision.failure().is_none()
        && !decision.effects().is_empty();
    assert_eq!(allowed, complete, "contract broken for {:?}", decision);
    if !allowed {
        assert!(decision.next_status().is_none());
        assert!(decision.failure().is_some());
        assert!(decision.effects().is_empty());
    }
}

proptest! {
    #[test]
    fn prop_evaluate_is_total(
        status in any_status(),
        action in any_action(),
        actor in any_actor(),
    ) {
        let result = evaluate_transition(status, action, actor);
        prop_assert!(result.is_allowed() != result.failure().is_some());
    }

    #[test]
    fn prop_decision_contract_holds(
        status in any_status(),
        action in any_action(),
        actor in any_actor(),
    ) {
        assert_contract(&WorkflowEngine::decide(status, action, actor));
    }

    #[test]
    fn prop_decision_contract_holds_for_any_name(
        status in any_status(),
        name in "\\PC{0,12}",
        actor in any_actor(),
    ) {
        assert_contract(&WorkflowEngine::decide_named(status, &name, actor));
    }

    #[test]
    fn prop_terminal_states_reject_everything(action in any_action(), actor in any_actor()) {
        for status in [DocumentStatus::Approved, DocumentStatus::Rejected] {
            let result = evaluate_transition(status, action, actor);
            prop_assert_eq!(result.failure(), Some(TransitionFailure::InvalidState));
        }
    }

    #[test]
    fn prop_state_checked_before_permission(action in any_action(), actor in any_actor()) {
        // SUBMITTED is never valid for submit; DRAFT never for decisions
        let wrong_status = if action.is_decision() {
            DocumentStatus::Draft
        } else {
            DocumentStatus::Submitted
        };
        let result = evaluate_transition(wrong_status, action, actor);
        prop_assert_eq!(result.failure(), Some(TransitionFailure::InvalidState));
    }

    #[test]
    fn prop_allowed_effects_are_ordered(
        status in any_status(),
        action in any_action(),
        actor in any_actor(),
    ) {
        let decision = WorkflowEngine::decide(status, action, actor);
        if let Decision::Allowed { next_status, effects } = decision {
            prop_assert_eq!(&effects[0], &Effect::UpdateStatus { new_status: next_status });
            prop_assert!(matches!(effects.last(), Some(Effect::CreateAuditLog { .. })), "last effect should be CreateAuditLog");
            let audit_count = effects
                .iter()
                .filter(|e| matches!(e, Effect::CreateAuditLog { .. }))
                .count();
            prop_assert_eq!(audit_count, 1);
            prop_assert_eq!(effects.len(), if action.is_decision() { 3 } else { 2 });
        }
    }
}

#[test]
fn test_owner_cannot_decide_even_as_admin() {
    // GIVEN an owner who is also admin and manager
    let actor = ActorContext {
        is_owner: true,
        is_manager: true,
        is_admin: true,
    };

    // WHEN deciding their own submitted document
    for action in [WorkflowAction::Approve, WorkflowAction::Reject] {
        let decision = WorkflowEngine::decide(DocumentStatus::Submitted, action, actor);

        // THEN permission is denied
        assert_eq!(decision.failure(), Some(TransitionFailure::Permission));
    }
}

#[test]
fn test_approve_effects_exact() {
    let manager = ActorContext {
        is_owner: false,
        is_manager: true,
        is_admin: false,
    };

    let decision =
        WorkflowEngine::decide(DocumentStatus::Submitted, WorkflowAction::Approve, manager);

    assert_eq!(
        decision.effects(),
        &[
            Effect::UpdateStatus {
                new_status: DocumentStatus::Approved
            },
            Effect::CreateApprovalStep {
                status: DocumentStatus::Approved
            },
            Effect::CreateAuditLog {
                action: AuditAction::DocumentApproved
            },
        ]
    );
}

#[test]
fn test_unknown_action_name_is_denied() {
    let actor = ActorContext {
        is_owner: true,
        is_manager: true,
        is_admin: true,
    };

    let result = evaluate_named(DocumentStatus::Draft, "archive", actor);
    assert_eq!(result.failure(), Some(TransitionFailure::InvalidAction));
    assert!(result.next_status().is_none());
}
