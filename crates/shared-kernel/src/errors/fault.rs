// crates/shared-kernel/src/errors/fault.rs

use thiserror::Error;
use tonic::Code;

/// Ordinary local failures raised by business code that carry no error code.
///
/// A catch scope classifies them through its rules; the exception handler
/// uses [`Fault::status_code`] to pick the transport status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fault {
    #[error("Validation failed for field '{field}': {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },

    /// The operation is valid but the current state forbids it
    #[error("Invalid state: {reason}")]
    InvalidState {
        reason: String,
    },

    #[error("{entity} not found with id '{id}'")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    #[error("{entity} already exists with {field} = '{value}'")]
    AlreadyExists {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Optimistic locking / version mismatch
    #[error("Concurrency conflict: {reason}")]
    Conflict {
        reason: String,
    },

    #[error("Unauthenticated: {reason}")]
    Unauthenticated {
        reason: String,
    },

    #[error("Forbidden: {reason}")]
    Forbidden {
        reason: String,
    },

    #[error("Dependency unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Fault {
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { field, reason: reason.into() }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState { reason: reason.into() }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Standard transport status for this kind of failure.
    pub fn status_code(&self) -> Code {
        match self {
            Self::InvalidArgument { .. } => Code::InvalidArgument,
            Self::InvalidState { .. } => Code::FailedPrecondition,
            Self::NotFound { .. } => Code::NotFound,
            Self::AlreadyExists { .. } => Code::AlreadyExists,
            Self::Conflict { .. } => Code::Aborted,
            Self::Unauthenticated { .. } => Code::Unauthenticated,
            Self::Forbidden { .. } => Code::PermissionDenied,
            Self::Unavailable(_) => Code::Unavailable,
            Self::Internal(_) => Code::Internal,
        }
    }
}
