// crates/shared-kernel/src/utils/test_utils.rs
#![cfg(test)]

use thiserror::Error;
use tonic::metadata::{AsciiMetadataValue, MetadataMap};
use tonic::{Code, Status};

use crate::infrastructure::grpc::ERROR_TRAILER_KEY;

crate::error_codes! {
    /// Codes of the service under test.
    pub enum OrderError in protocol "order.v1.OrderError" {
        Unspecified => "ORDER_ERROR_UNSPECIFIED",
        Invalid => "X_INVALID",
        NotFound => "ORDER_ERROR_NOT_FOUND",
        Unavailable => "ORDER_ERROR_UNAVAILABLE",
        Locked => "ORDER_ERROR_LOCKED",
        Empty => "",
    }
}

crate::error_codes! {
    /// Codes of a downstream service.
    pub enum StockError in protocol "stock.v1.StockError" {
        Unspecified => "STOCK_ERROR_UNSPECIFIED",
        OutOfStock => "STOCK_ERROR_OUT_OF_STOCK",
        Offline => "STOCK_ERROR_OFFLINE",
    }
}

crate::error_codes! {
    pub enum LedgerError in internal "orders.internal.LedgerError" {
        Locked => "LOCKED",
        Overdrawn => "OVERDRAWN",
        Retained => "RETAINED",
    }
}

crate::error_codes! {
    pub enum AuditError in internal "orders.internal.AuditError" {
        Locked => "LOCKED",
    }
}

#[derive(Debug, Error)]
#[error("disk on fire")]
pub struct DiskFailure;

#[derive(Debug, Error)]
#[error("unparsable payload: {0}")]
pub struct ParseFailure(pub String);

/// Failure returned by a downstream call, optionally carrying its error name.
pub fn remote_failure(error_name: Option<&str>) -> Status {
    let mut metadata = MetadataMap::new();
    if let Some(name) = error_name {
        metadata.insert(ERROR_TRAILER_KEY, AsciiMetadataValue::try_from(name).unwrap());
    }
    Status::with_metadata(Code::Unavailable, "stock service down", metadata)
}
