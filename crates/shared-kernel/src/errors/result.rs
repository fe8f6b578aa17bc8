// crates/shared-kernel/src/errors/result.rs

use crate::errors::{Failure, GrpcError};

/// Result of a catch scope: the error is already part of the chain.
pub type GrpcResult<T> = std::result::Result<T, GrpcError>;

/// Result of a unit of work running inside a catch scope, or of a call path
/// that hands its failures to the exception handler as they are.
pub type FailureResult<T> = std::result::Result<T, Failure>;
