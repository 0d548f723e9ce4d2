//! Execution hook interface for deterministic interleaving tests

use crate::execution::command::WorkflowCommand;
use crate::model::Document;

/// Interception points around the engine's locked section.
///
/// Every method defaults to a no-op; the production path behaves the same
/// with or without a hook attached.
pub trait ExecutionHook: Send + Sync {
    /// Called before the transaction that takes the exclusive lock begins
    fn before_lock(&self, _command: &WorkflowCommand) {}

    /// Called once the aggregate has been loaded under the lock
    fn after_lock(&self, _document: &Document) {}

    /// Called after the handler succeeded, right before commit
    fn before_commit(&self, _document: &Document) {}
}

/// Default hook: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExecutionHook;

impl ExecutionHook for NoopExecutionHook {}
