// crates/shared-kernel/src/errors/mod.rs

mod classifier;
mod error_code;
mod failure;
mod fault;
mod grpc_error;
mod result;


pub use classifier::{CodeMap, ErrorPredicate, ErrorRules, Resolution, Subject, TypeRule, TypeRules};
pub use error_code::{DomainKind, ErrorCode, ErrorCodeEnum, ErrorDomain, InvalidErrorName};
pub use failure::Failure;
pub use fault::Fault;
pub use grpc_error::{BoxError, GrpcError};
pub use result::{FailureResult, GrpcResult};
