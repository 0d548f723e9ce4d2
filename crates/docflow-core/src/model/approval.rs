//! Approval step: the single decision record of a document

use crate::model::document::DocumentStatus;
use crate::model::ids::{DocumentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of an APPROVE or REJECT decision
///
/// At most one exists per document; the store enforces this with a
/// uniqueness constraint on `document_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub id: i64,
    pub document_id: DocumentId,
    pub decided_by: Option<UserId>,
    /// Always `Approved` or `Rejected`
    pub status: DocumentStatus,
    pub decided_at: DateTime<Utc>,
}
