//! Pure transition evaluator
//!
//! `evaluate_transition` is total: every (status, action, actor) triple
//! yields exactly one `TransitionResult`. It performs no I/O and never
//! panics. For each action the status precondition is checked strictly
//! before the permission check, so an illegal state is reported even when
//! the actor would also lack permission.

use crate::model::DocumentStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow action requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowAction {
    Submit,
    Approve,
    Reject,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 3] = [
        WorkflowAction::Submit,
        WorkflowAction::Approve,
        WorkflowAction::Reject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::Submit => "SUBMIT",
            WorkflowAction::Approve => "APPROVE",
            WorkflowAction::Reject => "REJECT",
        }
    }

    /// APPROVE and REJECT record an approval step
    pub fn is_decision(&self) -> bool {
        matches!(self, WorkflowAction::Approve | WorkflowAction::Reject)
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowAction {
    type Err = String;

    /// Case-insensitive parse of an action name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUBMIT" => Ok(WorkflowAction::Submit),
            "APPROVE" => Ok(WorkflowAction::Approve),
            "REJECT" => Ok(WorkflowAction::Reject),
            _ => Err(format!("Unknown workflow action: {}", s)),
        }
    }
}

/// Facts about the caller relative to one document
///
/// Derived fresh for every attempt; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub is_owner: bool,
    pub is_manager: bool,
    pub is_admin: bool,
}

/// Why a transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionFailure {
    InvalidState,
    Permission,
    InvalidAction,
}

impl TransitionFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionFailure::InvalidState => "INVALID_STATE",
            TransitionFailure::Permission => "PERMISSION",
            TransitionFailure::InvalidAction => "INVALID_ACTION",
        }
    }
}

impl fmt::Display for TransitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    Allowed {
        next_status: DocumentStatus,
    },
    Denied {
        failure: TransitionFailure,
        reason: &'static str,
    },
}

impl TransitionResult {
    fn denied(failure: TransitionFailure, reason: &'static str) -> Self {
        TransitionResult::Denied { failure, reason }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, TransitionResult::Allowed { .. })
    }

    pub fn next_status(&self) -> Option<DocumentStatus> {
        match self {
            TransitionResult::Allowed { next_status } => Some(*next_status),
            TransitionResult::Denied { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<TransitionFailure> {
        match self {
            TransitionResult::Allowed { .. } => None,
            TransitionResult::Denied { failure, .. } => Some(*failure),
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            TransitionResult::Allowed { .. } => None,
            TransitionResult::Denied { reason, .. } => Some(*reason),
        }
    }
}

/// Evaluate whether `action` is legal for a document in `current_status`
pub fn evaluate_transition(
    current_status: DocumentStatus,
    action: WorkflowAction,
    actor: ActorContext,
) -> TransitionResult {
    use TransitionFailure::{InvalidState, Permission};

    match action {
        WorkflowAction::Submit => {
            if current_status != DocumentStatus::Draft {
                return TransitionResult::denied(
                    InvalidState,
                    "Only draft documents can be submitted",
                );
            }
            if !actor.is_owner {
                return TransitionResult::denied(Permission, "Only the document owner can submit");
            }
            TransitionResult::Allowed {
                next_status: DocumentStatus::Submitted,
            }
        }

        WorkflowAction::Approve => {
            if current_status != DocumentStatus::Submitted {
                return TransitionResult::denied(
                    InvalidState,
                    "Only submitted documents can be approved",
                );
            }
            if actor.is_owner {
                return TransitionResult::denied(Permission, "Self-approval is not allowed");
            }
            if !(actor.is_manager || actor.is_admin) {
                return TransitionResult::denied(
                    Permission,
                    "Only managers or admins may approve",
                );
            }
            TransitionResult::Allowed {
                next_status: DocumentStatus::Approved,
            }
        }

        WorkflowAction::Reject => {
            if current_status != DocumentStatus::Submitted {
                return TransitionResult::denied(
                    InvalidState,
                    "Only submitted documents can be rejected",
                );
            }
            if actor.is_owner {
                return TransitionResult::denied(Permission, "Self-rejection is not allowed");
            }
            if !(actor.is_manager || actor.is_admin) {
                return TransitionResult::denied(Permission, "Only managers or admins may reject");
            }
            TransitionResult::Allowed {
                next_status: DocumentStatus::Rejected,
            }
        }
    }
}

/// Evaluate a free-form action name
///
/// Names outside the three known actions yield a denied
/// `INVALID_ACTION` result instead of an error.
pub fn evaluate_named(
    current_status: DocumentStatus,
    action_name: &str,
    actor: ActorContext,
) -> TransitionResult {
    match action_name.parse::<WorkflowAction>() {
        Ok(action) => evaluate_transition(current_status, action, actor),
        Err(_) => {
            TransitionResult::denied(TransitionFailure::InvalidAction, "Unknown workflow action")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: ActorContext = ActorContext {
        is_owner: true,
        is_manager: false,
        is_admin: false,
    };
    const MANAGER: ActorContext = ActorContext {
        is_owner: false,
        is_manager: true,
        is_admin: false,
    };
    const ADMIN: ActorContext = ActorContext {
        is_owner: false,
        is_manager: false,
        is_admin: true,
    };
    const EMPLOYEE: ActorContext = ActorContext {
        is_owner: false,
        is_manager: false,
        is_admin: false,
    };

    #[test]
    fn test_owner_submits_draft() {
        let result = evaluate_transition(DocumentStatus::Draft, WorkflowAction::Submit, OWNER);
        assert_eq!(result.next_status(), Some(DocumentStatus::Submitted));
    }

    #[test]
    fn test_non_owner_cannot_submit() {
        let result = evaluate_transition(DocumentStatus::Draft, WorkflowAction::Submit, MANAGER);
        assert_eq!(result.failure(), Some(TransitionFailure::Permission));
    }

    #[test]
    fn test_submit_state_checked_before_permission() {
        // Non-owner on a submitted document: state failure wins
        let result =
            evaluate_transition(DocumentStatus::Submitted, WorkflowAction::Submit, EMPLOYEE);
        assert_eq!(result.failure(), Some(TransitionFailure::InvalidState));
        assert_eq!(result.reason(), Some("Only draft documents can be submitted"));
    }

    #[test]
    fn test_manager_and_admin_can_approve() {
        for actor in [MANAGER, ADMIN] {
            let result =
                evaluate_transition(DocumentStatus::Submitted, WorkflowAction::Approve, actor);
            assert_eq!(result.next_status(), Some(DocumentStatus::Approved));
        }
    }

    #[test]
    fn test_manager_can_reject() {
        let result =
            evaluate_transition(DocumentStatus::Submitted, WorkflowAction::Reject, MANAGER);
        assert_eq!(result.next_status(), Some(DocumentStatus::Rejected));
    }

    #[test]
    fn test_self_approval_forbidden_even_for_managers() {
        let owner_manager = ActorContext {
            is_owner: true,
            is_manager: true,
            is_admin: true,
        };
        let result = evaluate_transition(
            DocumentStatus::Submitted,
            WorkflowAction::Approve,
            owner_manager,
        );
        assert_eq!(result.failure(), Some(TransitionFailure::Permission));
        assert_eq!(result.reason(), Some("Self-approval is not allowed"));

        let result = evaluate_transition(
            DocumentStatus::Submitted,
            WorkflowAction::Reject,
            owner_manager,
        );
        assert_eq!(result.reason(), Some("Self-rejection is not allowed"));
    }

    #[test]
    fn test_employee_cannot_decide() {
        let result =
            evaluate_transition(DocumentStatus::Submitted, WorkflowAction::Approve, EMPLOYEE);
        assert_eq!(result.failure(), Some(TransitionFailure::Permission));
        assert_eq!(result.reason(), Some("Only managers or admins may approve"));
    }

    #[test]
    fn test_approve_on_draft_reports_state_not_permission() {
        let result = evaluate_transition(DocumentStatus::Draft, WorkflowAction::Approve, OWNER);
        assert_eq!(result.failure(), Some(TransitionFailure::InvalidState));
    }

    #[test]
    fn test_unknown_action_name_is_invalid_action() {
        let result = evaluate_named(DocumentStatus::Draft, "ARCHIVE", OWNER);
        assert!(!result.is_allowed());
        assert_eq!(result.failure(), Some(TransitionFailure::InvalidAction));
        assert_eq!(result.next_status(), None);
    }

    #[test]
    fn test_named_action_is_case_insensitive() {
        let result = evaluate_named(DocumentStatus::Draft, "submit", OWNER);
        assert!(result.is_allowed());
    }
}
