//! Workflow command: one execution intent

use crate::execution::context::ExecutionContext;
use crate::model::DocumentId;
use crate::state_machine::WorkflowAction;
use std::fmt;

/// Aggregate kinds the execution engine knows how to lock and load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateType {
    Document,
}

impl AggregateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateType::Document => "document",
        }
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-level input contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowCommand {
    pub aggregate_type: AggregateType,
    pub aggregate_id: DocumentId,
    pub action: WorkflowAction,
    pub context: ExecutionContext,
}

impl WorkflowCommand {
    pub fn for_document(
        document_id: DocumentId,
        action: WorkflowAction,
        context: ExecutionContext,
    ) -> Self {
        Self {
            aggregate_type: AggregateType::Document,
            aggregate_id: document_id,
            action,
            context,
        }
    }
}
