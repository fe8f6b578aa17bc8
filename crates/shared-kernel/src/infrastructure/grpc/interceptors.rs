// crates/shared-kernel/src/infrastructure/grpc/interceptors.rs

use tonic::metadata::AsciiMetadataValue;
use tonic::{Request, Status};
use uuid::Uuid;

use crate::infrastructure::grpc::RpcContext;

/// Header carrying the id of the end user on whose behalf a call is made.
/// Set by the gateway, forwarded as-is between services.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Validated user id, stored in the request extensions by [`user_id_interceptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Server interceptor validating the optional `x-user-id` header.
pub fn user_id_interceptor(mut req: Request<()>) -> Result<Request<()>, Status> {
    let Some(raw) = req.metadata().get(USER_ID_HEADER) else {
        return Ok(req);
    };

    let user_id = raw
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| Status::invalid_argument(format!("Invalid '{USER_ID_HEADER}' header")))?;

    req.extensions_mut().insert(UserId(user_id));

    Ok(req)
}

/// Client interceptor copying the current call's user id onto outgoing requests.
pub fn forward_call_context(mut req: Request<()>) -> Result<Request<()>, Status> {
    propagate_user_id(&mut req)?;
    Ok(req)
}

/// Same as [`forward_call_context`] for clients that build typed requests by hand.
pub fn propagate_user_id<T>(req: &mut Request<T>) -> Result<(), Status> {
    let Some(user_id) = RpcContext::current().and_then(|ctx| ctx.user_id()) else {
        return Ok(());
    };

    let value = AsciiMetadataValue::try_from(user_id.to_string().as_str())
        .map_err(|e| Status::internal(format!("Cannot forward user id: {e}")))?;
    req.metadata_mut().insert(USER_ID_HEADER, value);

    Ok(())
}
