//! Command orchestration layer.
//!
//! Document commands and the engine command dispatch that fronts them
//! together with the workflow transitions.

pub mod documents;
pub mod engine_command;
