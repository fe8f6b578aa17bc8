// crates/shared-kernel/src/errors/grpc_error.rs

use thiserror::Error;
use tonic::Status;

use crate::errors::ErrorCode;
use crate::infrastructure::grpc::RpcName;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Chain of a failure on its way to the wire.
///
/// Values are never mutated: a catch scope either re-raises them verbatim or
/// wraps them into a new variant.
#[derive(Debug, Error)]
pub enum GrpcError {
    /// Expected violation raised directly by business logic.
    #[error("{code}@{rpc}")]
    Domain { code: ErrorCode, rpc: RpcName },

    /// Local failure; a missing code is reported as unspecified.
    #[error("{}@{rpc}", code_name(.code))]
    Server {
        code: Option<ErrorCode>,
        #[source]
        cause: BoxError,
        rpc: RpcName,
    },

    /// Failure of a call to another service, code already remapped locally.
    #[error("{}@{rpc}", code_name(.code))]
    ClientCall {
        code: Option<ErrorCode>,
        #[source]
        cause: Status,
        rpc: RpcName,
    },

    /// Tentative classification travelling up through nested scopes.
    /// Never written to the wire, its internal code stays out of the message.
    #[error("unresolved propagated error")]
    Propagation {
        code: Option<ErrorCode>,
        #[source]
        cause: Option<BoxError>,
    },

    /// The awaiting caller went away. Not a failure kind, never classified.
    #[error("cancelled@{rpc}")]
    Cancelled { rpc: RpcName },
}

fn code_name(code: &Option<ErrorCode>) -> &str {
    code.as_ref().map(ErrorCode::name).unwrap_or_default()
}

impl GrpcError {
    pub fn domain(code: impl Into<ErrorCode>) -> Self {
        Self::Domain {
            code: code.into(),
            rpc: RpcName::current(),
        }
    }

    /// Marker for an internal error that an enclosing scope is expected to
    /// translate into its own protocol code.
    pub fn propagate(code: impl Into<ErrorCode>) -> Self {
        Self::Propagation {
            code: Some(code.into()),
            cause: None,
        }
    }

    pub fn propagate_with(code: impl Into<ErrorCode>, cause: impl Into<BoxError>) -> Self {
        Self::Propagation {
            code: Some(code.into()),
            cause: Some(cause.into()),
        }
    }

    pub fn server(cause: impl Into<BoxError>, code: Option<ErrorCode>) -> Self {
        Self::Server {
            code,
            cause: cause.into(),
            rpc: RpcName::current(),
        }
    }

    pub fn client_call(cause: Status, code: Option<ErrorCode>) -> Self {
        Self::ClientCall {
            code,
            cause,
            rpc: RpcName::current(),
        }
    }

    pub fn cancelled() -> Self {
        Self::Cancelled { rpc: RpcName::current() }
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Domain { code, .. } => Some(code),
            Self::Server { code, .. }
            | Self::ClientCall { code, .. }
            | Self::Propagation { code, .. } => code.as_ref(),
            Self::Cancelled { .. } => None,
        }
    }

    /// Finalized failures: re-raised verbatim by every enclosing scope.
    pub fn is_wire_bound(&self) -> bool {
        matches!(
            self,
            Self::Domain { .. } | Self::Server { .. } | Self::ClientCall { .. }
        )
    }

    pub fn is_propagation(&self) -> bool {
        matches!(self, Self::Propagation { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Messages of every cause below this error, outermost first.
    pub fn causes(&self) -> Vec<String> {
        std::iter::successors(std::error::Error::source(self), |&e| e.source())
            .map(ToString::to_string)
            .collect()
    }
}
