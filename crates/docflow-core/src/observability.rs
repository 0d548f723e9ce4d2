//! Observability boundary for workflow transitions
//!
//! Observers are passive: they must not fail and must not influence control
//! flow. The correlation id travels inside the `ExecutionContext` argument.

use crate::errors::WorkflowError;
use crate::execution::ExecutionContext;
use crate::model::{DocumentId, DocumentStatus};
use crate::state_machine::WorkflowAction;
use crate::{log_op_end, log_op_error, log_op_start};
use docflow_core_types::schema::OP_TRANSITION;
use std::time::Instant;

/// Start marker returned by `log_attempt`, used for latency
#[derive(Debug, Clone, Copy)]
pub struct AttemptMarker {
    started: Instant,
}

impl AttemptMarker {
    pub fn now() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn from_instant(started: Instant) -> Self {
        Self { started }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

/// Outcome reported by `log_result`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome<'a> {
    pub allowed: bool,
    pub failure: Option<&'a str>,
}

impl<'a> TransitionOutcome<'a> {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            failure: None,
        }
    }

    pub fn failed(failure: &'a str) -> Self {
        Self {
            allowed: false,
            failure: Some(failure),
        }
    }
}

pub trait TransitionObserver: Send + Sync {
    /// Record that a transition is about to be evaluated
    fn log_attempt(
        &self,
        ctx: &ExecutionContext,
        document_id: DocumentId,
        current_status: DocumentStatus,
        action: WorkflowAction,
    ) -> AttemptMarker;

    /// Record the outcome of a transition attempt
    fn log_result(
        &self,
        ctx: &ExecutionContext,
        document_id: DocumentId,
        action: WorkflowAction,
        outcome: TransitionOutcome<'_>,
        latency_ms: f64,
    );

    /// Record an unexpected (infrastructure) failure
    fn log_exception(
        &self,
        _ctx: &ExecutionContext,
        _document_id: DocumentId,
        _action: WorkflowAction,
        _err: &WorkflowError,
        _latency_ms: f64,
    ) {
    }
}

/// Observer emitting canonical `workflow.transition` events through tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransitionObserver;

impl TransitionObserver for TracingTransitionObserver {
    fn log_attempt(
        &self,
        ctx: &ExecutionContext,
        document_id: DocumentId,
        current_status: DocumentStatus,
        action: WorkflowAction,
    ) -> AttemptMarker {
        let marker = AttemptMarker::now();
        log_op_start!(
            OP_TRANSITION,
            correlation_id = %ctx.correlation_id(),
            actor_id = ctx.actor_id.get(),
            document_id = document_id.get(),
            current_status = current_status.as_str(),
            action = action.as_str(),
            source = ctx.source.as_str(),
        );
        marker
    }

    fn log_result(
        &self,
        ctx: &ExecutionContext,
        document_id: DocumentId,
        action: WorkflowAction,
        outcome: TransitionOutcome<'_>,
        latency_ms: f64,
    ) {
        log_op_end!(
            OP_TRANSITION,
            duration_ms = latency_ms.round() as u64,
            correlation_id = %ctx.correlation_id(),
            actor_id = ctx.actor_id.get(),
            document_id = document_id.get(),
            action = action.as_str(),
            allowed = outcome.allowed,
            failure = outcome.failure.unwrap_or("none"),
        );
    }

    fn log_exception(
        &self,
        ctx: &ExecutionContext,
        document_id: DocumentId,
        action: WorkflowAction,
        err: &WorkflowError,
        latency_ms: f64,
    ) {
        log_op_error!(
            OP_TRANSITION,
            err,
            duration_ms = latency_ms.round() as u64,
            correlation_id = %ctx.correlation_id(),
            actor_id = ctx.actor_id.get(),
            document_id = document_id.get(),
            action = action.as_str(),
        );
    }
}
