// crates/shared-kernel/src/infrastructure/grpc/rpc_context.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tonic::Request;
use uuid::Uuid;

use crate::errors::{ErrorCode, ErrorCodeEnum, ErrorDomain};
use crate::infrastructure::grpc::interceptors::{UserId, USER_ID_HEADER};

tokio::task_local! {
    static CURRENT_RPC: RpcContext;
}

/// `service/method` of a call, followed by the request parameters when known.
/// `unknown RPC` when no call context is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RpcName(Option<Arc<str>>);

impl RpcName {
    pub fn new(service: &str, method: &str) -> Self {
        Self(Some(format!("{service}/{method}").into()))
    }

    /// Appends the request parameters: `service/method {params:?}`.
    pub fn with_params(self, params: &impl fmt::Debug) -> Self {
        match self.0 {
            Some(path) => Self(Some(format!("{path} {params:?}").into())),
            None => self,
        }
    }

    pub fn unknown() -> Self {
        Self(None)
    }

    /// Name of the call running on the current task.
    pub fn current() -> Self {
        CURRENT_RPC
            .try_with(|ctx| ctx.rpc.clone())
            .unwrap_or_default()
    }

    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for RpcName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(path) => f.write_str(path),
            None => f.write_str("unknown RPC"),
        }
    }
}

/// Logical context of the call being served.
///
/// Installed once per call by the handler. Read by failure constructors (for
/// the `code@service/method` message), by outgoing client calls (to forward
/// the caller's user id), and by catch scopes and the exception handler (for
/// the code domain of the responding service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcContext {
    rpc: RpcName,
    user_id: Option<Uuid>,
    unspecified: Option<ErrorCode>,
}

impl RpcContext {
    pub fn new(service: &str, method: &str) -> Self {
        Self {
            rpc: RpcName::new(service, method),
            user_id: None,
            unspecified: None,
        }
    }

    /// Builds the context of an inbound call, the request message appended to
    /// the RPC name.
    ///
    /// Prefers the [`UserId`] stored by the interceptor, falls back to parsing
    /// the raw header. A malformed header is ignored here; rejecting it is the
    /// interceptor's job.
    pub fn from_request<T: fmt::Debug>(service: &str, method: &str, request: &Request<T>) -> Self {
        let user_id = request
            .extensions()
            .get::<UserId>()
            .map(|id| id.0)
            .or_else(|| {
                request
                    .metadata()
                    .get(USER_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| Uuid::parse_str(v).ok())
            });

        Self {
            rpc: RpcName::new(service, method).with_params(request.get_ref()),
            user_id,
            unspecified: None,
        }
    }

    /// Declares the responding service through its unspecified code.
    /// The code's domain is the only one its failures may carry on the wire.
    pub fn for_service<E: ErrorCodeEnum>(mut self, unspecified: E) -> Self {
        self.unspecified = Some(unspecified.code());
        self
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn rpc(&self) -> &RpcName {
        &self.rpc
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn unspecified(&self) -> Option<&ErrorCode> {
        self.unspecified.as_ref()
    }

    pub fn service_domain(&self) -> Option<ErrorDomain> {
        self.unspecified.as_ref().map(ErrorCode::domain)
    }

    pub fn current() -> Option<RpcContext> {
        CURRENT_RPC.try_with(|ctx| ctx.clone()).ok()
    }

    /// Runs `fut` with this context installed for the whole call.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT_RPC.scope(self, fut).await
    }

    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT_RPC.sync_scope(self, f)
    }
}
