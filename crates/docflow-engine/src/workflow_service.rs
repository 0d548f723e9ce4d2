//! Orchestration service: the single `perform` entry point
//!
//! Builds the command from a context snapshot, hands it to the execution
//! engine, and reports every attempt to the observer and metrics sink.
//! Observability never changes the outcome.

use crate::execution::ExecutionEngine;
use docflow_core::decision::{Decision, WorkflowEngine};
use docflow_core::effects::Effect;
use docflow_core::errors::{ExError, WorkflowError};
use docflow_core::execution::{ExecutionContext, ExecutionSource, WorkflowCommand};
use docflow_core::metrics::{
    failure_metric, MetricsSink, NoopMetrics, METRIC_TRANSITION_FAILURE,
    METRIC_TRANSITION_LATENCY, METRIC_TRANSITION_SUCCESS,
};
use docflow_core::model::{ActorIdentity, Document, DocumentId};
use docflow_core::observability::{
    AttemptMarker, TracingTransitionObserver, TransitionObserver, TransitionOutcome,
};
use docflow_core::state_machine::{TransitionFailure, WorkflowAction};
use docflow_store::SqliteRepo;
use rusqlite::{Connection, Transaction};
use std::sync::Arc;

/// Reason reported when the requested transition has already happened
pub const REPLAY_REASON: &str = "Idempotent replay: transition already applied";

pub struct DocumentWorkflowService {
    engine: ExecutionEngine,
    observer: Arc<dyn TransitionObserver>,
    metrics: Arc<dyn MetricsSink>,
    source: ExecutionSource,
}

impl Default for DocumentWorkflowService {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWorkflowService {
    pub fn new() -> Self {
        Self {
            engine: ExecutionEngine::new(),
            observer: Arc::new(TracingTransitionObserver),
            metrics: Arc::new(NoopMetrics),
            source: ExecutionSource::default(),
        }
    }

    pub fn with_engine(mut self, engine: ExecutionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TransitionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Source tag recorded in every context this service snapshots
    pub fn with_source(mut self, source: ExecutionSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> ExecutionSource {
        self.source
    }

    /// Apply `action` to a document on behalf of `actor`
    ///
    /// # Errors
    ///
    /// - `PermissionViolation` / `InvalidTransition` when the workflow
    ///   forbids the action (nothing is persisted)
    /// - `DocumentNotFound` for an unknown id
    /// - `EngineExecution` for storage failures, including lock timeouts
    pub fn perform(
        &self,
        conn: &mut Connection,
        document_id: DocumentId,
        action: WorkflowAction,
        actor: &ActorIdentity,
    ) -> Result<Document, WorkflowError> {
        let context = ExecutionContext::snapshot(actor, self.source);
        self.perform_with_context(conn, document_id, action, context)
    }

    /// `perform` with a context the caller already snapshotted
    ///
    /// # Errors
    ///
    /// Same as [`DocumentWorkflowService::perform`].
    pub fn perform_with_context(
        &self,
        conn: &mut Connection,
        document_id: DocumentId,
        action: WorkflowAction,
        context: ExecutionContext,
    ) -> Result<Document, WorkflowError> {
        let started = AttemptMarker::now();
        let command = WorkflowCommand::for_document(document_id, action, context);
        let mut attempt: Option<AttemptMarker> = None;

        let result = self.engine.execute(conn, &command, |tx, document| {
            attempt = Some(self.observer.log_attempt(
                &command.context,
                document.id,
                document.status,
                command.action,
            ));
            decide_and_apply(tx, document, &command)
        });

        // No attempt marker when the lock or the load failed
        let latency_ms = attempt.unwrap_or(started).elapsed_ms();
        self.report(&command, &result, latency_ms);
        result
    }

    fn report(
        &self,
        command: &WorkflowCommand,
        result: &Result<Document, WorkflowError>,
        latency_ms: f64,
    ) {
        let ctx = &command.context;
        match result {
            Ok(_) => {
                self.observer.log_result(
                    ctx,
                    command.aggregate_id,
                    command.action,
                    TransitionOutcome::allowed(),
                    latency_ms,
                );
                self.metrics.increment(METRIC_TRANSITION_SUCCESS);
            }
            Err(err) => {
                if err.is_retryable() {
                    self.observer.log_exception(
                        ctx,
                        command.aggregate_id,
                        command.action,
                        err,
                        latency_ms,
                    );
                }
                self.observer.log_result(
                    ctx,
                    command.aggregate_id,
                    command.action,
                    TransitionOutcome::failed(err.failure_label()),
                    latency_ms,
                );
                self.metrics.increment(METRIC_TRANSITION_FAILURE);
                self.metrics.increment(&failure_metric(err.failure_label()));
            }
        }
        self.metrics
            .record_latency(METRIC_TRANSITION_LATENCY, latency_ms);
    }
}

/// Handler body run under the lock
fn decide_and_apply(
    tx: &Transaction<'_>,
    document: &mut Document,
    command: &WorkflowCommand,
) -> Result<Document, WorkflowError> {
    let actor = command.context.actor_context_for(document);

    match WorkflowEngine::decide(document.status, command.action, actor) {
        Decision::Denied { failure, reason } => Err(match failure {
            TransitionFailure::Permission => WorkflowError::permission(reason),
            TransitionFailure::InvalidState | TransitionFailure::InvalidAction => {
                WorkflowError::invalid_transition(reason)
            }
        }),
        Decision::Allowed {
            next_status,
            effects,
        } => {
            if next_status == document.status {
                return Err(WorkflowError::invalid_transition(REPLAY_REASON));
            }
            for effect in &effects {
                apply_effect(tx, document, &command.context, effect)?;
            }
            Ok(document.clone())
        }
    }
}

fn apply_effect(
    tx: &Transaction<'_>,
    document: &mut Document,
    ctx: &ExecutionContext,
    effect: &Effect,
) -> Result<(), ExError> {
    match *effect {
        Effect::UpdateStatus { new_status } => {
            document.updated_at = SqliteRepo::update_document_status(tx, document.id, new_status)?;
            document.status = new_status;
        }
        Effect::CreateApprovalStep { status } => {
            SqliteRepo::insert_approval_step(tx, document.id, ctx.actor_id, status)?;
        }
        Effect::CreateAuditLog { action } => {
            let metadata = serde_json::json!({
                "document_id": document.id.get(),
                "correlation_id": ctx.correlation_id().as_str(),
            });
            SqliteRepo::insert_audit_log(
                tx,
                action,
                Some(ctx.actor_id),
                Some(document.id),
                &metadata,
            )?;
        }
    }
    Ok(())
}
