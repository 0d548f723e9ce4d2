//! Decision engine
//!
//! Wraps the pure evaluator and turns an allowed result into the ordered
//! effect list. No persistence access and no logging happen here.

use crate::effects::{effects_for, Effect};
use crate::model::DocumentStatus;
use crate::state_machine::{
    evaluate_named, evaluate_transition, ActorContext, TransitionFailure, TransitionResult,
    WorkflowAction,
};

/// Decision on one requested transition
///
/// The variants encode the contract: an allowed decision always has a next
/// status and a non-empty effect list; a denied one has a failure kind and
/// no effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed {
        next_status: DocumentStatus,
        effects: Vec<Effect>,
    },
    Denied {
        failure: TransitionFailure,
        reason: String,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    pub fn next_status(&self) -> Option<DocumentStatus> {
        match self {
            Decision::Allowed { next_status, .. } => Some(*next_status),
            Decision::Denied { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<TransitionFailure> {
        match self {
            Decision::Allowed { .. } => None,
            Decision::Denied { failure, .. } => Some(*failure),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allowed { .. } => None,
            Decision::Denied { reason, .. } => Some(reason),
        }
    }

    /// Effects to apply; empty when denied
    pub fn effects(&self) -> &[Effect] {
        match self {
            Decision::Allowed { effects, .. } => effects,
            Decision::Denied { .. } => &[],
        }
    }

    fn from_result(action: Option<WorkflowAction>, result: TransitionResult) -> Self {
        match (result, action) {
            (TransitionResult::Allowed { next_status }, Some(action)) => Decision::Allowed {
                next_status,
                effects: effects_for(action, next_status),
            },
            (TransitionResult::Allowed { .. }, None) => Decision::Denied {
                failure: TransitionFailure::InvalidAction,
                reason: "Unknown workflow action".to_string(),
            },
            (TransitionResult::Denied { failure, reason }, _) => Decision::Denied {
                failure,
                reason: reason.to_string(),
            },
        }
    }
}

/// Pure domain engine
pub struct WorkflowEngine;

impl WorkflowEngine {
    /// Decide a transition for a known action
    pub fn decide(
        current_status: DocumentStatus,
        action: WorkflowAction,
        actor: ActorContext,
    ) -> Decision {
        let result = evaluate_transition(current_status, action, actor);
        Decision::from_result(Some(action), result)
    }

    /// Decide a transition for a free-form action name
    pub fn decide_named(
        current_status: DocumentStatus,
        action_name: &str,
        actor: ActorContext,
    ) -> Decision {
        let action = action_name.parse::<WorkflowAction>().ok();
        let result = evaluate_named(current_status, action_name, actor);
        Decision::from_result(action, result)
    }
}
