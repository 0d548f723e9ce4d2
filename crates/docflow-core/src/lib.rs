//! Docflow Core - document approval workflow kernel
//!
//! This crate holds everything about the workflow that does not touch
//! storage:
//! - Document, approval step and audit log models
//! - The pure transition evaluator and the decision engine
//! - Declarative effects produced by an allowed decision
//! - Command and execution context values handed to the execution engine
//! - Collaborator traits for observability, metrics, roles and test hooks
//! - The error facility and structured logging macros

pub mod decision;
pub mod effects;
pub mod errors;
pub mod execution;
pub mod logging_facility;
pub mod metrics;
pub mod model;
pub mod observability;
pub mod roles;
pub mod state_machine;

// Used by the logging macros through `$crate`
pub use docflow_core_types;

// Re-export commonly used types
pub use decision::{Decision, WorkflowEngine};
pub use effects::Effect;
pub use errors::{ExError, ExErrorKind, Result, WorkflowError};
pub use execution::{ExecutionContext, ExecutionHook, ExecutionSource, WorkflowCommand};
pub use metrics::{InMemoryMetrics, MetricsSink, NoopMetrics};
pub use model::{
    ActorIdentity, ApprovalStep, AuditAction, AuditLog, Document, DocumentId, DocumentStatus,
    Role, UserId,
};
pub use observability::{TracingTransitionObserver, TransitionObserver};
pub use roles::{RoleDirectory, StaticRoleDirectory};
pub use state_machine::{evaluate_transition, ActorContext, TransitionFailure, WorkflowAction};
