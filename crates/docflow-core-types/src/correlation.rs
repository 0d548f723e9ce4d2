//! Correlation id
//!
//! A workflow call is correlated by value: the id is created (or accepted
//! from the caller) once, stored in the execution context and passed
//! explicitly to every log call and audit entry that needs it.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier tying together every log line produced by one workflow call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Fresh time-ordered id (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Accept an id supplied by the caller, e.g. an `X-Correlation-ID`
    /// header or a `--correlation-id` flag. Blank input yields a fresh id.
    pub fn from_header(value: &str) -> Self {
        match value.trim() {
            "" => Self::new(),
            trimmed => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
