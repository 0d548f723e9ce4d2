//! Domain model for the document approval workflow
//!
//! Persisted records (`Document`, `ApprovalStep`, `AuditLog`) and the
//! caller identity types used to derive per-document actor facts.

pub mod actor;
pub mod approval;
pub mod audit;
pub mod document;
pub mod ids;

pub use actor::{ActorIdentity, Role};
pub use approval::ApprovalStep;
pub use audit::{AuditAction, AuditLog};
pub use document::{Document, DocumentStatus};
pub use ids::{DocumentId, UserId};
