//! Declarative side-effect descriptors
//!
//! Effects carry no behaviour. The execution layer applies them, in the
//! order the decision engine emitted them, inside one transaction.

use crate::model::{AuditAction, DocumentStatus};
use crate::state_machine::WorkflowAction;
use serde::{Deserialize, Serialize};

/// A required mutation produced by an allowed decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Set the document status
    UpdateStatus { new_status: DocumentStatus },
    /// Record the single approval step of the document
    CreateApprovalStep { status: DocumentStatus },
    /// Append one audit entry
    CreateAuditLog { action: AuditAction },
}

/// Fixed action → audit tag table
pub fn audit_action_for(action: WorkflowAction) -> AuditAction {
    match action {
        WorkflowAction::Submit => AuditAction::DocumentSubmitted,
        WorkflowAction::Approve => AuditAction::DocumentApproved,
        WorkflowAction::Reject => AuditAction::DocumentRejected,
    }
}

/// Build the ordered effect list for an allowed transition
///
/// `UpdateStatus` first, `CreateApprovalStep` only for decisions,
/// exactly one `CreateAuditLog` last.
pub fn effects_for(action: WorkflowAction, next_status: DocumentStatus) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(3);
    effects.push(Effect::UpdateStatus {
        new_status: next_status,
    });
    if action.is_decision() {
        effects.push(Effect::CreateApprovalStep {
            status: next_status,
        });
    }
    effects.push(Effect::CreateAuditLog {
        action: audit_action_for(action),
    });
    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_effects() {
        let effects = effects_for(WorkflowAction::Submit, DocumentStatus::Submitted);
        assert_eq!(
            effects,
            vec![
                Effect::UpdateStatus {
                    new_status: DocumentStatus::Submitted
                },
                Effect::CreateAuditLog {
                    action: AuditAction::DocumentSubmitted
                },
            ]
        );
    }

    #[test]
    fn test_approve_effects_are_ordered() {
        let effects = effects_for(WorkflowAction::Approve, DocumentStatus::Approved);
        assert_eq!(
            effects,
            vec![
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
    fn test_reject_maps_to_rejected_audit_tag() {
        let effects = effects_for(WorkflowAction::Reject, DocumentStatus::Rejected);
        assert_eq!(
            effects.last(),
            Some(&Effect::CreateAuditLog {
                action: AuditAction::DocumentRejected
            })
        );
    }

    #[test]
    fn test_effect_serializes_with_kind_tag() {
        let json = serde_json::to_value(Effect::CreateApprovalStep {
            status: DocumentStatus::Rejected,
        })
        .unwrap();
        assert_eq!(json["kind"], "create_approval_step");
        assert_eq!(json["status"], "REJECTED");
    }
}
