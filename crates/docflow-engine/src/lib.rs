//! Docflow Engine - transactional execution of the approval workflow
//!
//! Coordinates the pure decision logic of docflow-core with the storage
//! primitives of docflow-store:
//! - `ExecutionEngine`: exclusive transaction around one workflow command
//! - `DocumentWorkflowService::perform`: the transition entry point
//! - document commands (create, edit draft) and `EngineCommand` dispatch

pub mod commands;
pub mod execution;
pub mod workflow_service;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use execution::ExecutionEngine;
pub use workflow_service::DocumentWorkflowService;
