//! Execution intent types
//!
//! Values handed to the execution engine, decoupled from any transport:
//! the command, the execution context snapshot and the optional test hook.

pub mod command;
pub mod context;
pub mod hooks;

pub use command::{AggregateType, WorkflowCommand};
pub use context::{ExecutionContext, ExecutionSource};
pub use hooks::{ExecutionHook, NoopExecutionHook};
