//! Append-only audit trail

use crate::errors::{ExError, ExErrorKind};
use crate::model::ids::{DocumentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audit event tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    DocumentCreated,
    DocumentSubmitted,
    DocumentApproved,
    DocumentRejected,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::DocumentCreated => "DOCUMENT_CREATED",
            AuditAction::DocumentSubmitted => "DOCUMENT_SUBMITTED",
            AuditAction::DocumentApproved => "DOCUMENT_APPROVED",
            AuditAction::DocumentRejected => "DOCUMENT_REJECTED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOCUMENT_CREATED" => Ok(AuditAction::DocumentCreated),
            "DOCUMENT_SUBMITTED" => Ok(AuditAction::DocumentSubmitted),
            "DOCUMENT_APPROVED" => Ok(AuditAction::DocumentApproved),
            "DOCUMENT_REJECTED" => Ok(AuditAction::DocumentRejected),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_audit_action")
                .with_message(format!("Unknown audit action: {}", other))),
        }
    }
}

/// Immutable audit entry
///
/// Entries are never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    pub action: AuditAction,
    pub actor_id: Option<UserId>,
    pub document_id: Option<DocumentId>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
