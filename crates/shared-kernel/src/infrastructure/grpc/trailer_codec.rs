// crates/shared-kernel/src/infrastructure/grpc/trailer_codec.rs

use thiserror::Error;
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap};
use tonic::Status;

use crate::errors::ErrorCode;

/// Trailing metadata key holding the error code name of a failed call.
pub const ERROR_TRAILER_KEY: &str = "custom-grpc-error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrailerError {
    #[error("error code {name:?} cannot be written to metadata")]
    InvalidName { name: String },
}

/// Reads and writes the error code trailer.
pub struct TrailerCodec;

impl TrailerCodec {
    pub fn key() -> AsciiMetadataKey {
        AsciiMetadataKey::from_static(ERROR_TRAILER_KEY)
    }

    pub fn encode(code: &ErrorCode) -> Result<(AsciiMetadataKey, AsciiMetadataValue), TrailerError> {
        let value = AsciiMetadataValue::try_from(code.name()).map_err(|_| {
            TrailerError::InvalidName { name: code.name().to_string() }
        })?;
        Ok((Self::key(), value))
    }

    /// Writes `code`, replacing any code already present.
    pub fn put(metadata: &mut MetadataMap, code: &ErrorCode) -> Result<(), TrailerError> {
        let (key, value) = Self::encode(code)?;
        metadata.insert(key, value);
        Ok(())
    }

    /// `None` means unclassified, which is not the same as `Some("")`.
    pub fn decode(metadata: &MetadataMap) -> Option<String> {
        let value = metadata.get(ERROR_TRAILER_KEY)?;
        match value.to_str() {
            Ok(name) => Some(name.to_string()),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable {ERROR_TRAILER_KEY} trailer, ignored");
                None
            }
        }
    }

    pub fn decode_status(status: &Status) -> Option<String> {
        Self::decode(status.metadata())
    }
}
