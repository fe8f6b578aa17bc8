// crates/shared-kernel/src/infrastructure/grpc/catch_scope.rs

use std::future::Future;
use tokio_util::sync::CancellationToken;
use tonic::Status;

use crate::errors::{
    BoxError, CodeMap, ErrorCode, ErrorCodeEnum, ErrorDomain, ErrorRules, Failure, GrpcError,
    GrpcResult, Resolution, Subject, TypeRules,
};
use crate::infrastructure::grpc::{RpcContext, TrailerCodec};

/// Runs one unit of work and turns its failure into a [`GrpcError`].
///
/// `run`, `run_async` and `run_blocking` only differ in how the work is
/// executed; all three go through [`CatchScope::resolve`]:
///
/// 1. finalized failures (`Domain`, `Server`, `ClientCall`) are re-raised as-is,
///    the first scope to finalize wins;
/// 2. propagation markers get one resolution attempt: a code of the service's
///    own protocol domain finalizes them, anything else sends them further up;
/// 3. remote failures are remapped from their trailer into a `ClientCall`;
/// 4. local failures are classified by type into a `Server` (or a `Domain`
///    when a terminal rule matched).
///
/// The service domain is set with [`CatchScope::for_service`] or taken from
/// the current [`RpcContext`]. Without one, markers are never finalized.
///
/// Cancellation is never classified.
#[derive(Debug, Clone)]
pub struct CatchScope<'r> {
    rules: &'r ErrorRules,
    service_domain: Option<ErrorDomain>,
    cancellation: Option<CancellationToken>,
}

impl<'r> CatchScope<'r> {
    pub fn new(rules: &'r ErrorRules) -> Self {
        Self { rules, service_domain: None, cancellation: None }
    }

    /// Markers only finalize into codes of `E`'s domain.
    pub fn for_service<E: ErrorCodeEnum>(self) -> Self {
        self.with_service_domain(E::DOMAIN)
    }

    pub fn with_service_domain(mut self, domain: ErrorDomain) -> Self {
        self.service_domain = Some(domain);
        self
    }

    /// Ends the scope with [`GrpcError::Cancelled`] as soon as `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn run<T, F>(&self, work: F) -> GrpcResult<T>
    where
        F: FnOnce() -> Result<T, Failure>,
    {
        work().map_err(|failure| self.resolve(failure))
    }

    pub async fn run_async<T, F, Fut>(&self, work: F) -> GrpcResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let outcome = match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(self.cancelled()),
                    outcome = work() => outcome,
                }
            }
            None => work().await,
        };

        outcome.map_err(|failure| self.resolve(failure))
    }

    /// Runs blocking work on the tokio blocking pool, within the current call context.
    ///
    /// A fired cancellation token ends the scope but cannot interrupt the
    /// blocking work: it runs to completion and its result is dropped.
    pub async fn run_blocking<T, F>(&self, work: F) -> GrpcResult<T>
    where
        F: FnOnce() -> Result<T, Failure> + Send + 'static,
        T: Send + 'static,
    {
        let context = RpcContext::current();
        let handle = tokio::task::spawn_blocking(move || match context {
            Some(context) => context.sync_scope(work),
            None => work(),
        });

        let joined = match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::debug!("blocking work left running after cancellation");
                        return Err(self.cancelled());
                    }
                    joined = handle => joined,
                }
            }
            None => handle.await,
        };

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(Failure::Cancelled),
            Err(e) => Err(Failure::local(e)),
        };

        outcome.map_err(|failure| self.resolve(failure))
    }

    /// Classifies a failure against this scope's rules.
    pub fn resolve(&self, failure: Failure) -> GrpcError {
        match failure {
            Failure::Chain(GrpcError::Propagation { code, cause }) => self.resolve_marker(code, cause),
            Failure::Chain(error) => error,
            Failure::Remote(status) => self.resolve_remote(status),
            Failure::Local(cause) => self.resolve_local(cause),
            Failure::Cancelled => self.cancelled(),
        }
    }

    fn resolve_marker(&self, code: Option<ErrorCode>, cause: Option<BoxError>) -> GrpcError {
        let resolved = self.rules.resolve(Subject::Marker(code.as_ref()));
        let marker = GrpcError::Propagation { code, cause };

        match resolved {
            Some(resolved) if self.owns(&resolved) => {
                tracing::debug!(code = %resolved, "propagated error resolved");
                GrpcError::server(marker, Some(resolved))
            }
            Some(resolved) => {
                tracing::debug!(code = %resolved, "propagated error remapped, still unresolved");
                let cause = match marker {
                    GrpcError::Propagation { cause: Some(cause), .. } => cause,
                    marker => Box::new(marker),
                };
                GrpcError::Propagation { code: Some(resolved), cause: Some(cause) }
            }
            None => marker,
        }
    }

    /// Whether `code` belongs to the protocol domain of the service this scope runs in.
    fn owns(&self, code: &ErrorCode) -> bool {
        let domain = self
            .service_domain
            .or_else(|| RpcContext::current().and_then(|ctx| ctx.service_domain()));
        code.is_protocol() && domain == Some(code.domain())
    }

    fn resolve_remote(&self, status: Status) -> GrpcError {
        let remote = TrailerCodec::decode_status(&status);
        let code = self.rules.resolve(Subject::Remote(remote.as_deref()));

        tracing::debug!(
            status = ?status.code(),
            remote = remote.as_deref().unwrap_or_default(),
            code = code.as_ref().map(ErrorCode::name).unwrap_or_default(),
            "downstream failure remapped"
        );

        GrpcError::client_call(status, code)
    }

    fn resolve_local(&self, cause: BoxError) -> GrpcError {
        match self.rules.classify(Subject::Local(&*cause)) {
            Some(Resolution { code, terminal: true }) if code.is_protocol() => {
                tracing::debug!(code = %code, cause = %cause, "expected violation");
                GrpcError::domain(code)
            }
            resolution => GrpcError::server(cause, resolution.map(|r| r.code)),
        }
    }

    fn cancelled(&self) -> GrpcError {
        tracing::debug!("unit of work cancelled");
        GrpcError::cancelled()
    }
}

pub fn catch<T>(rules: &ErrorRules, work: impl FnOnce() -> Result<T, Failure>) -> GrpcResult<T> {
    CatchScope::new(rules).run(work)
}

pub async fn catch_async<T, F, Fut>(rules: &ErrorRules, work: F) -> GrpcResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    CatchScope::new(rules).run_async(work).await
}

/// Every failure gets `code`.
pub fn catch_fixed<T>(
    code: impl Into<ErrorCode>,
    work: impl FnOnce() -> Result<T, Failure>,
) -> GrpcResult<T> {
    catch(&ErrorRules::fixed(code), work)
}

pub async fn catch_fixed_async<T, F, Fut>(code: impl Into<ErrorCode>, work: F) -> GrpcResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    catch_async(&ErrorRules::fixed(code), work).await
}

pub fn catch_by_type<T>(
    rules: TypeRules,
    work: impl FnOnce() -> Result<T, Failure>,
) -> GrpcResult<T> {
    catch(&ErrorRules::from(rules), work)
}

pub async fn catch_by_type_async<T, F, Fut>(rules: TypeRules, work: F) -> GrpcResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    catch_async(&ErrorRules::from(rules), work).await
}

pub fn catch_by_code<T>(map: CodeMap, work: impl FnOnce() -> Result<T, Failure>) -> GrpcResult<T> {
    catch(&ErrorRules::from(map), work)
}

pub async fn catch_by_code_async<T, F, Fut>(map: CodeMap, work: F) -> GrpcResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    catch_async(&ErrorRules::from(map), work).await
}
