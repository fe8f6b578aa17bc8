// crates/shared-kernel/src/infrastructure/grpc/catch_scope_test.rs

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    use crate::errors::{
        CodeMap, ErrorCode, ErrorRules, Failure, Fault, GrpcError, GrpcResult, TypeRule, TypeRules,
    };
    use crate::infrastructure::grpc::{
        catch, catch_by_code, catch_fixed, catch_fixed_async, CatchScope, RpcContext, RpcName,
    };
    use crate::utils::{
        remote_failure, AuditError, DiskFailure, LedgerError, OrderError, ParseFailure, StockError,
    };

    fn code(c: impl Into<ErrorCode>) -> ErrorCode {
        c.into()
    }

    fn code_of(c: OrderError) -> ErrorCode {
        c.into()
    }

    fn order_rules() -> ErrorRules {
        TypeRules::new(OrderError::Unspecified)
            .on_match::<Fault, _>(OrderError::Invalid, Fault::is_invalid_state)
            .on::<DiskFailure>(OrderError::Unavailable)
            .into()
    }

    /// Rules whose only predicate counts how often it is evaluated.
    fn counting_rules() -> (ErrorRules, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = TypeRules::new(OrderError::Unspecified)
            .rule(TypeRule::when(OrderError::Invalid, move |_: &(dyn StdError + 'static)| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }))
            .into();
        (rules, calls)
    }

    #[test]
    fn test_success_passes_through() {
        let rules = order_rules();
        let result = catch(&rules, || Ok::<_, Failure>(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_domain_error_bypasses_type_rules() {
        let (rules, calls) = counting_rules();

        let err = catch(&rules, || -> Result<(), Failure> {
            Err(GrpcError::domain(OrderError::NotFound).into())
        })
        .unwrap_err();

        assert!(matches!(&err, GrpcError::Domain { code, .. } if *code == code_of(OrderError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_local_failure_classified_by_type() {
        let rules = order_rules();

        let err = catch(&rules, || -> Result<(), Failure> {
            Err(Fault::invalid_state("order already shipped").into())
        })
        .unwrap_err();

        match err {
            GrpcError::Server { code, cause, .. } => {
                assert_eq!(code, Some(code_of(OrderError::Invalid)));
                assert!(cause.is::<Fault>());
            }
            other => panic!("expected a server failure, got {other:?}"),
        }
    }

    #[test]
    fn test_unmapped_failure_takes_supplied_default() {
        let rules: ErrorRules = TypeRules::new(OrderError::Locked)
            .on::<DiskFailure>(OrderError::Unavailable)
            .into();

        let err = catch(&rules, || -> Result<(), Failure> {
            Err(Failure::local(ParseFailure("}".into())))
        })
        .unwrap_err();

        assert_eq!(err.code(), Some(&code(OrderError::Locked)));
        assert_ne!(err.code(), Some(&code(OrderError::Unspecified)));
    }

    #[test]
    fn test_without_rules_failure_stays_unclassified() {
        let err = catch(&ErrorRules::None, || -> Result<(), Failure> {
            Err(Failure::local(DiskFailure))
        })
        .unwrap_err();

        assert!(matches!(err, GrpcError::Server { code: None, .. }));
        assert_eq!(err.to_string(), "@unknown RPC");
    }

    #[test]
    fn test_terminal_rule_raises_domain_error() {
        let rules: ErrorRules = TypeRules::new(OrderError::Unspecified)
            .rule(TypeRule::of::<ParseFailure>(OrderError::Invalid).terminal())
            .into();

        let err = catch(&rules, || -> Result<(), Failure> {
            Err(Failure::local(ParseFailure("[".into())))
        })
        .unwrap_err();

        assert!(matches!(err, GrpcError::Domain { .. }));
        assert_eq!(err.code(), Some(&code(OrderError::Invalid)));
    }

    #[test]
    fn test_remote_code_is_remapped() {
        let map = CodeMap::new(OrderError::Unspecified).map(StockError::Offline, OrderError::Unavailable);

        let err = catch_by_code(map, || -> Result<(), Failure> {
            Err(remote_failure(Some("STOCK_ERROR_OFFLINE")).into())
        })
        .unwrap_err();

        match err {
            GrpcError::ClientCall { code, cause, .. } => {
                assert_eq!(code, Some(code_of(OrderError::Unavailable)));
                assert_eq!(cause.code(), tonic::Code::Unavailable);
            }
            other => panic!("expected a client call failure, got {other:?}"),
        }
    }

    #[test]
    fn test_unmapped_remote_code_takes_local_default() {
        let map = CodeMap::new(OrderError::Unspecified).map(StockError::Offline, OrderError::Unavailable);

        let err = catch_by_code(map, || -> Result<(), Failure> {
            Err(remote_failure(Some("STOCK_ERROR_OUT_OF_STOCK")).into())
        })
        .unwrap_err();

        assert!(matches!(err, GrpcError::ClientCall { .. }));
        assert_eq!(err.code(), Some(&code(OrderError::Unspecified)));
    }

    #[test]
    fn test_inner_scope_without_rule_returns_marker_unchanged() {
        let err = catch(&ErrorRules::None, || -> Result<(), Failure> {
            Err(GrpcError::propagate(LedgerError::Locked).into())
        })
        .unwrap_err();

        assert!(err.is_propagation());
        assert_eq!(err.code(), Some(&code(LedgerError::Locked)));
    }

    #[test]
    fn test_marker_resolved_only_by_matching_outer_scope() {
        let inner: ErrorRules = CodeMap::new(AuditError::Locked)
            .map(LedgerError::Overdrawn, AuditError::Locked)
            .into();
        let outer: ErrorRules = CodeMap::new(OrderError::Unspecified)
            .map(AuditError::Locked, OrderError::Locked)
            .into();

        let err = CatchScope::new(&outer).for_service::<OrderError>().run(|| {
            catch(&inner, || -> Result<(), Failure> {
                Err(GrpcError::propagate_with(LedgerError::Locked, DiskFailure).into())
            })
            .map_err(|inner_err| {
                assert!(inner_err.is_propagation(), "internal target keeps propagating");
                assert_eq!(inner_err.code(), Some(&code(AuditError::Locked)));
                Failure::from(inner_err)
            })
        })
        .unwrap_err();

        match &err {
            GrpcError::Server { code, .. } => assert_eq!(code, &Some(code_of(OrderError::Locked))),
            other => panic!("expected a server failure, got {other:?}"),
        }
        assert_eq!(
            err.causes(),
            vec!["unresolved propagated error".to_string(), "disk on fire".to_string()],
            "the updated marker keeps the original cause"
        );
    }

    #[test]
    fn test_marker_mapped_to_another_service_keeps_propagating() {
        // Arrange
        let rules: ErrorRules = CodeMap::new(OrderError::Unspecified)
            .map(LedgerError::Locked, StockError::Offline)
            .into();

        // Act
        let err = CatchScope::new(&rules)
            .for_service::<OrderError>()
            .run(|| -> Result<(), Failure> { Err(GrpcError::propagate(LedgerError::Locked).into()) })
            .unwrap_err();

        // Assert
        assert!(err.is_propagation(), "a downstream protocol code is not ours to send");
        assert_eq!(err.code(), Some(&code(StockError::Offline)));
        assert!(!err.is_wire_bound());
    }

    #[test]
    fn test_marker_finalized_into_the_domain_of_the_current_call() {
        let rules: ErrorRules = CodeMap::new(OrderError::Unspecified)
            .map(LedgerError::Locked, OrderError::Locked)
            .into();
        let marker = || -> Result<(), Failure> { Err(GrpcError::propagate(LedgerError::Locked).into()) };

        let outside = catch(&rules, marker).unwrap_err();
        let inside = RpcContext::new("order.v1.OrderService", "Lock")
            .for_service(OrderError::Unspecified)
            .sync_scope(|| catch(&rules, marker))
            .unwrap_err();

        assert!(outside.is_propagation(), "no service known, nothing to finalize into");
        assert!(matches!(&inside, GrpcError::Server { code: Some(c), .. } if *c == code_of(OrderError::Locked)));
        assert_eq!(inside.to_string(), "ORDER_ERROR_LOCKED@order.v1.OrderService/Lock");
    }

    #[test]
    fn test_first_finalizer_wins() {
        let outer = ErrorRules::fixed(OrderError::Locked);

        let err = catch(&outer, || {
            catch_fixed(OrderError::Invalid, || -> Result<(), Failure> {
                Err(Failure::local(DiskFailure))
            })
            .map_err(Failure::from)
        })
        .unwrap_err();

        assert_eq!(err.code(), Some(&code(OrderError::Invalid)));
    }

    #[tokio::test]
    async fn test_async_scope_keeps_call_context() {
        let rules = order_rules();

        let err = RpcContext::new("order.v1.OrderService", "Create")
            .scope(CatchScope::new(&rules).run_async(|| async {
                tokio::task::yield_now().await;
                Err::<(), _>(Failure::from(Fault::invalid_state("closed")))
            }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "X_INVALID@order.v1.OrderService/Create");
    }

    #[tokio::test]
    async fn test_cancellation_skips_classifier() {
        let (rules, calls) = counting_rules();
        let token = CancellationToken::new();
        let scope = CatchScope::new(&rules).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result: GrpcResult<()> = scope
            .run_async(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(Failure::local(DiskFailure))
            })
            .await;
        canceller.await.unwrap();

        assert!(matches!(result, Err(GrpcError::Cancelled { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_blocking_work_runs_to_completion() {
        // Arrange
        let (rules, calls) = counting_rules();
        let token = CancellationToken::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let done = finished.clone();
        token.cancel();

        // Act
        let err = CatchScope::new(&rules)
            .with_cancellation(token)
            .run_blocking(move || -> Result<(), Failure> {
                std::thread::sleep(Duration::from_millis(20));
                done.fetch_add(1, Ordering::SeqCst);
                Err(Failure::local(DiskFailure))
            })
            .await
            .unwrap_err();

        // Assert
        assert!(err.is_cancelled());
        for _ in 0..200 {
            if finished.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(finished.load(Ordering::SeqCst), 1, "blocking work is not interrupted");
        assert_eq!(calls.load(Ordering::SeqCst), 0, "its result is dropped unclassified");
    }

    #[tokio::test]
    async fn test_dropped_scope_never_classifies() {
        let (rules, calls) = counting_rules();

        let outcome = tokio::time::timeout(
            Duration::from_millis(10),
            CatchScope::new(&rules).run_async(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err::<(), _>(Failure::local(DiskFailure))
            }),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_work_is_not_a_failure() {
        let (rules, calls) = counting_rules();

        let err = CatchScope::new(&rules)
            .run_async(|| async { Err::<(), _>(Failure::Cancelled) })
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(err.code(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blocking_work_keeps_context() {
        let rules = ErrorRules::fixed(OrderError::Unavailable);

        let (value, err) = RpcContext::new("order.v1.OrderService", "Export")
            .scope(async {
                let scope = CatchScope::new(&rules);
                let value = scope
                    .run_blocking(|| Ok::<_, Failure>(RpcName::current().to_string()))
                    .await;
                let err = scope
                    .run_blocking(|| -> Result<(), Failure> {
                        Err(std::io::Error::other("disk full").into())
                    })
                    .await;
                (value, err)
            })
            .await;

        assert_eq!(value.unwrap(), "order.v1.OrderService/Export");
        assert_eq!(
            err.unwrap_err().to_string(),
            "ORDER_ERROR_UNAVAILABLE@order.v1.OrderService/Export"
        );
    }

    #[tokio::test]
    async fn test_blocking_panic_becomes_server_failure() {
        let rules = order_rules();

        let err = CatchScope::new(&rules)
            .run_blocking(|| -> Result<(), Failure> { panic!("worker exploded") })
            .await
            .unwrap_err();

        assert!(matches!(err, GrpcError::Server { .. }));
        assert_eq!(err.code(), Some(&code(OrderError::Unspecified)));
    }

    #[tokio::test]
    async fn test_fixed_async_scope() {
        let err = catch_fixed_async(OrderError::Locked, || async {
            Err::<(), _>(Failure::local(DiskFailure))
        })
        .await
        .unwrap_err();

        assert_eq!(err.code(), Some(&code(OrderError::Locked)));
    }
}
