use crate::model::{DocumentId, UserId};
use docflow_core_types::CorrelationId;
use thiserror::Error;

/// Result type alias using WorkflowError
pub type Result<T> = std::result::Result<T, WorkflowError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// tests and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    ConstraintViolation,

    // Workflow rules
    PermissionViolation,
    InvalidTransition,

    // Infrastructure
    Serialization,
    Persistence,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::PermissionViolation => "ERR_PERMISSION_VIOLATION",
            ExErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Kinds that describe a storage/infrastructure fault rather than a rule
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Serialization
                | ExErrorKind::Persistence
                | ExErrorKind::Timeout
                | ExErrorKind::ConstraintViolation
                | ExErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Store functions return this directly.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    correlation_id: Option<CorrelationId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            correlation_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add correlation ID context
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Caller-facing error taxonomy of the workflow
///
/// `PermissionViolation` and `InvalidTransition` are domain rule failures;
/// callers should not retry them. `EngineExecution` wraps an infrastructure
/// failure and keeps the store error as its source.
#[derive(Error, Debug, Clone)]
pub enum WorkflowError {
    /// Actor lacks authority for the action on this document
    #[error("Permission violation: {reason}")]
    PermissionViolation { reason: String },

    /// Action is illegal for the current status (includes replays)
    #[error("Invalid transition: {reason}")]
    InvalidTransition { reason: String },

    #[error("Document not found: {document_id}")]
    DocumentNotFound { document_id: DocumentId },

    #[error("Actor not found: {actor_id}")]
    ActorNotFound { actor_id: UserId },

    /// Rejected input on document commands (blank title etc.)
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Storage or infrastructure failure (lock timeout, connection loss,
    /// constraint violation while applying effects)
    #[error("Engine execution failed: {0}")]
    EngineExecution(#[from] ExError),
}

impl WorkflowError {
    pub fn permission(reason: impl Into<String>) -> Self {
        WorkflowError::PermissionViolation {
            reason: reason.into(),
        }
    }

    pub fn invalid_transition(reason: impl Into<String>) -> Self {
        WorkflowError::InvalidTransition {
            reason: reason.into(),
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            WorkflowError::PermissionViolation { .. } => ExErrorKind::PermissionViolation,
            WorkflowError::InvalidTransition { .. } => ExErrorKind::InvalidTransition,
            WorkflowError::DocumentNotFound { .. } | WorkflowError::ActorNotFound { .. } => {
                ExErrorKind::NotFound
            }
            WorkflowError::Validation { .. } => ExErrorKind::InvalidInput,
            WorkflowError::EngineExecution(inner) => inner.kind(),
        }
    }

    /// Only infrastructure failures are worth retrying, and only by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::EngineExecution(_))
    }

    /// Short label used for metric names and result logs
    pub fn failure_label(&self) -> &'static str {
        match self {
            WorkflowError::PermissionViolation { .. } => "permission",
            WorkflowError::InvalidTransition { .. } => "invalid_transition",
            WorkflowError::DocumentNotFound { .. } | WorkflowError::ActorNotFound { .. } => {
                "not_found"
            }
            WorkflowError::Validation { .. } => "validation",
            WorkflowError::EngineExecution(_) => "engine",
        }
    }
}

/// Conversion from WorkflowError to ExError
///
/// Lets the logging macros classify any workflow failure.
impl From<WorkflowError> for ExError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::PermissionViolation { reason } => {
                ExError::new(ExErrorKind::PermissionViolation).with_message(reason)
            }
            WorkflowError::InvalidTransition { reason } => {
                ExError::new(ExErrorKind::InvalidTransition).with_message(reason)
            }
            WorkflowError::DocumentNotFound { document_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(document_id.to_string())
                    .with_message("Document not found")
            }
            WorkflowError::ActorNotFound { actor_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(actor_id.to_string())
                .with_message("Actor not found"),
            WorkflowError::Validation { field, reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!("Invalid {}: {}", field, reason)),
            WorkflowError::EngineExecution(inner) => inner,
        }
    }
}

impl From<&WorkflowError> for ExError {
    fn from(err: &WorkflowError) -> Self {
        err.clone().into()
    }
}
