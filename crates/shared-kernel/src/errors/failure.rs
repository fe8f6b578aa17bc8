// crates/shared-kernel/src/errors/failure.rs

use std::fmt;
use tonic::Status;

use crate::errors::{BoxError, Fault, GrpcError};

/// Whatever a unit of work inside a catch scope can fail with.
///
/// `?` converts [`GrpcError`], [`Status`], [`Fault`] and `std::io::Error`;
/// other error types go through [`Failure::local`].
#[derive(Debug)]
pub enum Failure {
    /// Already part of a chain (nested scope, domain error, marker).
    Chain(GrpcError),
    /// A call to another service failed; trailers are still attached.
    Remote(Status),
    /// Anything else that went wrong locally.
    Local(BoxError),
    Cancelled,
}

impl Failure {
    pub fn local(cause: impl Into<BoxError>) -> Self {
        Self::Local(cause.into())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(e) => fmt::Display::fmt(e, f),
            Self::Remote(status) => write!(f, "remote call failed: {status}"),
            Self::Local(e) => fmt::Display::fmt(e, f),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl From<GrpcError> for Failure {
    fn from(error: GrpcError) -> Self {
        Self::Chain(error)
    }
}

impl From<Status> for Failure {
    fn from(status: Status) -> Self {
        Self::Remote(status)
    }
}

impl From<Fault> for Failure {
    fn from(fault: Fault) -> Self {
        Self::Local(Box::new(fault))
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Self::Local(Box::new(error))
    }
}
