//! Execution context snapshot
//!
//! Captured once per `perform` call. Role changes after the snapshot is
//! taken cannot alter a decision already in flight.

use crate::errors::{ExError, ExErrorKind};
use crate::model::{ActorIdentity, Document, Role, UserId};
use crate::state_machine::ActorContext;
use docflow_core_types::CorrelationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Where a workflow call originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionSource {
    #[default]
    Ui,
    Api,
    Cli,
    System,
}

impl ExecutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionSource::Ui => "ui",
            ExecutionSource::Api => "api",
            ExecutionSource::Cli => "cli",
            ExecutionSource::System => "system",
        }
    }
}

impl fmt::Display for ExecutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionSource {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ui" => Ok(ExecutionSource::Ui),
            "api" => Ok(ExecutionSource::Api),
            "cli" => Ok(ExecutionSource::Cli),
            "system" => Ok(ExecutionSource::System),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_execution_source")
                .with_message(format!("Unknown execution source: {}", other))),
        }
    }
}

/// Execution-scoped metadata passed into the engine boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub actor_id: UserId,
    pub actor_roles: BTreeSet<Role>,
    pub is_superuser: bool,
    pub source: ExecutionSource,
    pub correlation_id: CorrelationId,
}

impl ExecutionContext {
    /// Snapshot an identity with a fresh correlation id
    pub fn snapshot(identity: &ActorIdentity, source: ExecutionSource) -> Self {
        Self {
            actor_id: identity.actor_id,
            actor_roles: identity.roles.clone(),
            is_superuser: identity.is_superuser,
            source,
            correlation_id: CorrelationId::new(),
        }
    }

    /// Reuse a correlation id supplied by the caller
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Derive the actor facts relative to `document`
    pub fn actor_context_for(&self, document: &Document) -> ActorContext {
        ActorContext {
            is_owner: document.is_owned_by(self.actor_id),
            is_manager: self.actor_roles.contains(&Role::Manager),
            is_admin: self.actor_roles.contains(&Role::Admin) || self.is_superuser,
        }
    }
}
