// crates/shared-kernel/src/infrastructure/grpc/trailer_codec_test.rs

#[cfg(test)]
mod tests {
    use tonic::metadata::{AsciiMetadataValue, MetadataMap};
    use tonic::Status;

    use crate::errors::{ErrorCode, ErrorCodeEnum};
    use crate::infrastructure::grpc::{TrailerCodec, ERROR_TRAILER_KEY};
    use crate::utils::{remote_failure, OrderError, StockError};

    #[test]
    fn test_decode_returns_encoded_name() {
        let codes = OrderError::ALL
            .iter()
            .map(ErrorCodeEnum::code)
            .chain(StockError::ALL.iter().map(ErrorCodeEnum::code));

        for code in codes {
            let mut metadata = MetadataMap::new();
            TrailerCodec::put(&mut metadata, &code).unwrap();

            assert_eq!(TrailerCodec::decode(&metadata).as_deref(), Some(code.name()));
        }
    }

    #[test]
    fn test_encode_uses_well_known_key() {
        let (key, value) = TrailerCodec::encode(&OrderError::Invalid.into()).unwrap();
        assert_eq!(key.as_str(), "custom-grpc-error");
        assert_eq!(value.to_str().unwrap(), "X_INVALID");
    }

    #[test]
    fn test_absent_key_is_not_empty_name() {
        let empty = MetadataMap::new();
        assert_eq!(TrailerCodec::decode(&empty), None);

        let mut classified_empty = MetadataMap::new();
        TrailerCodec::put(&mut classified_empty, &ErrorCode::from(OrderError::Empty)).unwrap();
        assert_eq!(TrailerCodec::decode(&classified_empty), Some(String::new()));
    }

    #[test]
    fn test_put_replaces_previous_code() {
        let mut metadata = MetadataMap::new();
        metadata.insert(ERROR_TRAILER_KEY, AsciiMetadataValue::from_static("STALE"));

        TrailerCodec::put(&mut metadata, &OrderError::Locked.into()).unwrap();

        assert_eq!(metadata.get_all(ERROR_TRAILER_KEY).iter().count(), 1);
        assert_eq!(TrailerCodec::decode(&metadata).as_deref(), Some("ORDER_ERROR_LOCKED"));
    }

    #[test]
    fn test_decode_status_reads_trailers() {
        assert_eq!(
            TrailerCodec::decode_status(&remote_failure(Some("STOCK_ERROR_OFFLINE"))).as_deref(),
            Some("STOCK_ERROR_OFFLINE")
        );
        assert_eq!(TrailerCodec::decode_status(&remote_failure(None)), None);
        assert_eq!(TrailerCodec::decode_status(&Status::internal("boom")), None);
    }
}
