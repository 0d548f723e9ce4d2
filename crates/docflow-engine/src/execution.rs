//! Execution engine
//!
//! Owns the transactional boundary of one workflow command:
//!
//! 1. `before_lock` hook
//! 2. open the exclusive transaction (blocks while another writer holds it)
//! 3. load the aggregate, `after_lock` hook
//! 4. run the handler against the locked aggregate
//! 5. `before_commit` hook, commit
//!
//! A handler error rolls the whole transaction back and is returned with
//! its type intact. Store failures on lock, load or commit come back as
//! `WorkflowError::EngineExecution` carrying the original error as source.

use docflow_core::errors::{ExError, WorkflowError};
use docflow_core::execution::{AggregateType, ExecutionHook, NoopExecutionHook, WorkflowCommand};
use docflow_core::model::Document;
use docflow_store::atomic::{begin_exclusive, commit, load_document_exclusive};
use rusqlite::{Connection, Transaction};
use std::sync::Arc;

pub struct ExecutionEngine {
    hook: Arc<dyn ExecutionHook>,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self {
            hook: Arc::new(NoopExecutionHook),
        }
    }

    /// Engine with interception points, for deterministic interleavings
    pub fn with_hook(hook: Arc<dyn ExecutionHook>) -> Self {
        Self { hook }
    }

    /// Run `handler` against the exclusively locked aggregate
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the aggregate does not exist
    /// - whatever the handler returns (after rollback)
    /// - `EngineExecution` for lock, load or commit failures
    pub fn execute<T, F>(
        &self,
        conn: &mut Connection,
        command: &WorkflowCommand,
        handler: F,
    ) -> Result<T, WorkflowError>
    where
        F: FnOnce(&Transaction<'_>, &mut Document) -> Result<T, WorkflowError>,
    {
        self.hook.before_lock(command);

        let tx = begin_exclusive(conn).map_err(|e| infrastructure(e, "lock", command))?;

        let mut document = match command.aggregate_type {
            AggregateType::Document => load_document_exclusive(&tx, command.aggregate_id)
                .map_err(|e| infrastructure(e, "load", command))?
                .ok_or(WorkflowError::DocumentNotFound {
                    document_id: command.aggregate_id,
                })?,
        };

        self.hook.after_lock(&document);

        let value = match handler(&tx, &mut document) {
            Ok(value) => value,
            Err(err) => {
                if err.kind().is_infrastructure() {
                    tracing::warn!(
                        correlation_id = %command.context.correlation_id(),
                        document_id = command.aggregate_id.get(),
                        err_code = err.kind().code(),
                        "storage fault inside handler, rolling back"
                    );
                }
                rollback(tx, command);
                return Err(err);
            }
        };

        self.hook.before_commit(&document);

        commit(tx).map_err(|e| infrastructure(e, "commit", command))?;
        Ok(value)
    }
}

fn rollback(tx: Transaction<'_>, command: &WorkflowCommand) {
    if let Err(err) = tx.rollback() {
        // The connection discards the transaction on drop regardless
        tracing::warn!(
            correlation_id = %command.context.correlation_id(),
            document_id = command.aggregate_id.get(),
            error = %err,
            "rollback failed"
        );
    }
}

fn infrastructure(err: ExError, stage: &str, command: &WorkflowCommand) -> WorkflowError {
    WorkflowError::EngineExecution(
        ExError::new(err.kind())
            .with_op(format!("execute.{}", stage))
            .with_entity_id(format!(
                "{}:{}",
                command.aggregate_type, command.aggregate_id
            ))
            .with_correlation_id(command.context.correlation_id().clone())
            .with_message(format!(
                "{} {} failed during {}",
                command.action, command.aggregate_type, stage
            ))
            .with_source(err),
    )
}
