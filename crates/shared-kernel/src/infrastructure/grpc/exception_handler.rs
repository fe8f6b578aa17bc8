// crates/shared-kernel/src/infrastructure/grpc/exception_handler.rs

use std::error::Error as StdError;
use std::io;
use std::sync::OnceLock;
use tonic::metadata::MetadataMap;
use tonic::{Code, Status};

use crate::errors::{ErrorCode, ErrorDomain, Failure, FailureResult, Fault, GrpcError, GrpcResult};
use crate::infrastructure::grpc::{ExceptionHandlerBuilder, RpcContext, TrailerCodec};

/// Boundary sink turning whatever is left of a failed call into the wire response:
/// a status code, the failure's message, and the error code trailer.
///
/// Stateless; one instance serves every call of a service. A handler built
/// without a service takes it from the current [`RpcContext`], so every
/// response of a declared service carries exactly one code of its domain.
#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    pub(crate) service_domain: Option<ErrorDomain>,
    pub(crate) unspecified: Option<ErrorCode>,
    pub(crate) log_causes: bool,
}

impl Default for ExceptionHandler {
    fn default() -> Self {
        ExceptionHandlerBuilder::default().build()
    }
}

impl ExceptionHandler {
    pub fn builder() -> ExceptionHandlerBuilder {
        ExceptionHandlerBuilder::default()
    }

    /// Process-wide handler configured from the environment, used by
    /// [`ToGrpcStatus`] and `From<GrpcError> for Status`. It declares no
    /// service of its own.
    pub fn global() -> &'static ExceptionHandler {
        static HANDLER: OnceLock<ExceptionHandler> = OnceLock::new();
        HANDLER.get_or_init(|| ExceptionHandlerBuilder::from_env().build())
    }

    pub fn handle(&self, failure: impl Into<Failure>) -> Status {
        match failure.into() {
            Failure::Chain(error) => self.handle_error(&error),
            Failure::Remote(status) => {
                // Downstream code is forwarded, its trailer is not ours to repeat.
                tracing::error!(
                    status = ?status.code(),
                    remote_message = status.message(),
                    "❌ unscoped downstream failure reached the boundary"
                );
                self.respond(status.code(), status.message().to_string(), self.unspecified().as_ref())
            }
            Failure::Local(cause) => {
                let code = status_code(&*cause);
                tracing::error!(
                    status = ?code,
                    error = %cause,
                    causes = ?self.causes_of(&*cause),
                    "❌ unscoped failure reached the boundary"
                );
                self.respond(code, cause.to_string(), self.unspecified().as_ref())
            }
            Failure::Cancelled => {
                tracing::debug!("call cancelled");
                Status::cancelled("cancelled")
            }
        }
    }

    pub fn handle_error(&self, error: &GrpcError) -> Status {
        let code = status_code(error);
        self.log(error, code);

        let trailer = match error {
            GrpcError::Cancelled { .. } => None,
            GrpcError::Propagation { .. } => self.unspecified(),
            _ => self.wire_code(error).cloned().or_else(|| self.unspecified()),
        };

        self.respond(code, error.to_string(), trailer.as_ref())
    }

    /// Own unspecified code, else the one declared by the call being served.
    fn unspecified(&self) -> Option<ErrorCode> {
        let unspecified = self
            .unspecified
            .clone()
            .or_else(|| RpcContext::current().and_then(|ctx| ctx.unspecified().cloned()));
        if unspecified.is_none() {
            tracing::warn!("no service declared, error code trailer left empty");
        }
        unspecified
    }

    fn service_domain(&self) -> Option<ErrorDomain> {
        self.service_domain
            .or_else(|| RpcContext::current().and_then(|ctx| ctx.service_domain()))
    }

    fn wire_code<'e>(&self, error: &'e GrpcError) -> Option<&'e ErrorCode> {
        let code = error.code()?;

        if !code.is_protocol() {
            tracing::warn!(code = %code, domain = %code.domain(), "internal error code dropped from the response");
            return None;
        }

        match self.service_domain() {
            Some(domain) if domain != code.domain() => {
                tracing::warn!(
                    code = %code,
                    domain = %code.domain(),
                    expected = %domain,
                    "foreign error code dropped from the response"
                );
                None
            }
            _ => Some(code),
        }
    }

    fn respond(&self, code: Code, message: String, trailer: Option<&ErrorCode>) -> Status {
        let mut metadata = MetadataMap::new();
        if let Some(error_code) = trailer {
            if let Err(e) = TrailerCodec::put(&mut metadata, error_code) {
                tracing::warn!(error = %e, "error code trailer skipped");
            }
        }
        Status::with_metadata(code, message, metadata)
    }

    fn log(&self, error: &GrpcError, status: Code) {
        match error {
            GrpcError::Domain { code, rpc } => {
                tracing::info!(code = %code, rpc = %rpc, status = ?status, "domain error");
            }
            GrpcError::Server { rpc, .. } | GrpcError::ClientCall { rpc, .. } => {
                tracing::error!(
                    error = %error,
                    rpc = %rpc,
                    status = ?status,
                    causes = ?self.causes_of(error),
                    "❌ call failed"
                );
            }
            GrpcError::Propagation { code, .. } => {
                tracing::error!(
                    code = code.as_ref().map(ErrorCode::name).unwrap_or_default(),
                    status = ?status,
                    causes = ?self.causes_of(error),
                    "❌ propagated error was never resolved"
                );
            }
            GrpcError::Cancelled { rpc } => {
                tracing::debug!(rpc = %rpc, "call cancelled");
            }
        }
    }

    fn causes_of(&self, error: &(dyn StdError + 'static)) -> Vec<String> {
        if !self.log_causes {
            return Vec::new();
        }
        std::iter::successors(error.source(), |&e| e.source())
            .map(ToString::to_string)
            .collect()
    }
}

/// First recognised failure in the cause chain decides the status.
fn status_code(error: &(dyn StdError + 'static)) -> Code {
    std::iter::successors(Some(error), |&e| e.source())
        .find_map(known_status)
        .unwrap_or(Code::Unknown)
}

fn known_status(error: &(dyn StdError + 'static)) -> Option<Code> {
    if let Some(fault) = error.downcast_ref::<Fault>() {
        return Some(fault.status_code());
    }
    if let Some(status) = error.downcast_ref::<Status>() {
        return Some(status.code());
    }
    if let Some(e) = error.downcast_ref::<io::Error>() {
        return io_status(e.kind());
    }
    if error.is::<tokio::time::error::Elapsed>() {
        return Some(Code::DeadlineExceeded);
    }
    match error.downcast_ref::<GrpcError>() {
        Some(GrpcError::Cancelled { .. }) => Some(Code::Cancelled),
        _ => None,
    }
}

fn io_status(kind: io::ErrorKind) -> Option<Code> {
    use io::ErrorKind::*;

    let code = match kind {
        NotFound => Code::NotFound,
        PermissionDenied => Code::PermissionDenied,
        AlreadyExists => Code::AlreadyExists,
        InvalidInput | InvalidData => Code::InvalidArgument,
        TimedOut => Code::DeadlineExceeded,
        ConnectionRefused | ConnectionReset | ConnectionAborted | NotConnected | BrokenPipe => {
            Code::Unavailable
        }
        _ => return None,
    };
    Some(code)
}

pub trait ToGrpcStatus<T> {
    fn map_grpc(self) -> Result<T, Status>;
}

impl<T> ToGrpcStatus<T> for GrpcResult<T> {
    fn map_grpc(self) -> Result<T, Status> {
        self.map_err(|e| ExceptionHandler::global().handle_error(&e))
    }
}

impl<T> ToGrpcStatus<T> for FailureResult<T> {
    fn map_grpc(self) -> Result<T, Status> {
        self.map_err(|e| ExceptionHandler::global().handle(e))
    }
}

impl From<GrpcError> for Status {
    fn from(error: GrpcError) -> Self {
        ExceptionHandler::global().handle_error(&error)
    }
}
