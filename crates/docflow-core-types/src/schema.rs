//! Canonical schema constants for structured logging and events
//!
//! These constants keep log field names identical across the core, the
//! store and the engine.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_CORRELATION_ID: &str = "correlation_id";

// Entity identifiers
pub const FIELD_DOCUMENT_ID: &str = "document_id";

// Workflow fields
pub const FIELD_ACTION: &str = "action";
pub const FIELD_CURRENT_STATUS: &str = "current_status";
pub const FIELD_ALLOWED: &str = "allowed";
pub const FIELD_FAILURE: &str = "failure";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical operation names
pub const OP_TRANSITION: &str = "workflow.transition";
pub const OP_CREATE_DOCUMENT: &str = "document.create";
pub const OP_UPDATE_DRAFT: &str = "document.update_draft";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
