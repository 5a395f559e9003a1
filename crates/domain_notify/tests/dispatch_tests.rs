//! Comprehensive tests for the bulk dispatch engine

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::PortError;
use domain_notify::{
    CancelHandle, DispatchConfig, DispatchEngine, DispatchOutcome, DispatchRequest,
    FailureReason, NotifyError, OutboundMessenger, RecipientOutcome,
};
use test_utils::{init_tracing, ChunkScript, MockMessenger, RecipientFixtures};

fn engine(messenger: Arc<MockMessenger>) -> DispatchEngine {
    init_tracing();
    DispatchEngine::new(messenger)
}

// ============================================================================
// Pre-flight Validation Tests
// ============================================================================

mod preflight_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_subject_fails_fast() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::single(), "  ", "Body");
        let result = engine.dispatch(request).await;

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
        assert_eq!(messenger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_body_fails_fast() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::single(), "Subject", "");
        let result = engine.dispatch(request).await;

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
        assert_eq!(messenger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_recipient_list_fails_fast() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(vec![], "Subject", "Body");
        let result = engine.dispatch(request).await;

        assert!(matches!(result, Err(NotifyError::Validation(_))));
        assert_eq!(messenger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_address_fails_fast_with_zero_sends() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let mut recipients = RecipientFixtures::addresses(5);
        recipients.push("not-an-address".to_string());
        let request = DispatchRequest::new(recipients, "Subject", "Body");
        let result = engine.dispatch(request).await;

        match result {
            Err(NotifyError::Validation(message)) => {
                assert!(message.contains("not-an-address"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        // Nothing sent, not even the valid prefix of the list
        assert_eq!(messenger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_a_configuration_error() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let request =
            DispatchRequest::new(RecipientFixtures::single(), "Subject", "Body").with_chunk_size(0);
        let result = engine.dispatch(request).await;

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
        assert_eq!(messenger.call_count(), 0);
    }
}

// ============================================================================
// Chunking Tests
// ============================================================================

mod chunking_tests {
    use super::*;

    #[tokio::test]
    async fn test_chunk_count_is_ceil_of_n_over_c() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::addresses(250), "Subject", "Body")
            .with_chunk_size(100);
        let result = engine.dispatch(request).await.unwrap();

        let calls = messenger.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].recipients.len(), 100);
        assert_eq!(calls[1].recipients.len(), 100);
        assert_eq!(calls[2].recipients.len(), 50);
        assert_eq!(result.attempted, 250);
        assert_eq!(result.succeeded, 250);
        assert_eq!(result.outcome, DispatchOutcome::Success);
    }

    #[tokio::test]
    async fn test_input_order_is_preserved_across_chunks() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let recipients = RecipientFixtures::addresses(7);
        let request =
            DispatchRequest::new(recipients.clone(), "Subject", "Body").with_chunk_size(3);
        engine.dispatch(request).await.unwrap();

        let seen: Vec<String> = messenger
            .calls()
            .into_iter()
            .flat_map(|call| call.recipients)
            .collect();
        assert_eq!(seen, recipients);
    }

    #[tokio::test]
    async fn test_default_chunk_size_applies() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        // 250 recipients, no explicit chunk size: default is 100
        let request = DispatchRequest::new(RecipientFixtures::addresses(250), "Subject", "Body");
        engine.dispatch(request).await.unwrap();
        assert_eq!(messenger.call_count(), 3);
    }

    #[tokio::test]
    async fn test_requested_chunk_size_is_capped_at_configured_max() {
        init_tracing();
        let messenger = Arc::new(MockMessenger::always_succeed());
        let config = DispatchConfig {
            default_chunk_size: 5,
            max_chunk_size: 10,
        };
        let engine = DispatchEngine::with_config(messenger.clone(), config).unwrap();

        let request = DispatchRequest::new(RecipientFixtures::addresses(25), "Subject", "Body")
            .with_chunk_size(1000);
        engine.dispatch(request).await.unwrap();

        // Capped to 10 per chunk
        assert_eq!(messenger.call_count(), 3);
    }

    #[tokio::test]
    async fn test_single_recipient_single_chunk() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::single(), "Subject", "Body");
        let result = engine.dispatch(request).await.unwrap();

        assert_eq!(messenger.call_count(), 1);
        assert_eq!(result.attempted, 1);
        assert_eq!(result.outcome, DispatchOutcome::Success);
    }
}

// ============================================================================
// Failure Aggregation Tests
// ============================================================================

mod aggregation_tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_failure_in_one_chunk_reference_scenario() {
        // 250 recipients, chunks [100, 100, 50]; chunk 2 fails transport-wide
        let messenger = Arc::new(MockMessenger::with_scripts(vec![
            ChunkScript::Succeed,
            ChunkScript::TransportFail("provider outage"),
            ChunkScript::Succeed,
        ]));
        let engine = engine(messenger.clone());

        let recipients = RecipientFixtures::addresses(250);
        let request =
            DispatchRequest::new(recipients.clone(), "Subject", "Body").with_chunk_size(100);
        let result = engine.dispatch(request).await.unwrap();

        // Chunk 3 was still attempted
        assert_eq!(messenger.call_count(), 3);
        assert_eq!(result.attempted, 250);
        assert_eq!(result.succeeded, 150);
        assert_eq!(result.failed.len(), 100);
        assert_eq!(result.outcome, DispatchOutcome::Partial);

        // Exactly the second chunk's recipients failed, all with the
        // transport reason code
        let failed: Vec<&str> = result
            .failed
            .iter()
            .map(|failure| failure.recipient.as_str())
            .collect();
        let expected: Vec<&str> = recipients[100..200].iter().map(String::as_str).collect();
        assert_eq!(failed, expected);
        assert!(result
            .failed
            .iter()
            .all(|failure| failure.reason == FailureReason::TransportError));
    }

    #[tokio::test]
    async fn test_provider_rejections_fail_only_the_rejected() {
        let messenger = Arc::new(MockMessenger::with_scripts(vec![ChunkScript::Reject(
            vec!["client1@example.com", "client3@example.com"],
            "invalid mailbox",
        )]));
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::addresses(5), "Subject", "Body");
        let result = engine.dispatch(request).await.unwrap();

        assert_eq!(result.attempted, 5);
        assert_eq!(result.succeeded, 3);
        assert_eq!(result.failed.len(), 2);
        assert_eq!(result.outcome, DispatchOutcome::Partial);
        for failure in &result.failed {
            assert_eq!(failure.reason, FailureReason::ProviderError);
            assert_eq!(failure.detail.as_deref(), Some("invalid mailbox"));
        }
    }

    #[tokio::test]
    async fn test_every_chunk_failing_yields_failed_outcome() {
        let messenger = Arc::new(MockMessenger::with_scripts(vec![
            ChunkScript::TransportFail("down"),
            ChunkScript::TransportFail("down"),
        ]));
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::addresses(4), "Subject", "Body")
            .with_chunk_size(2);
        let result = engine.dispatch(request).await.unwrap();

        assert_eq!(result.attempted, 4);
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed.len(), 4);
        assert_eq!(result.outcome, DispatchOutcome::Failed);
    }

    #[tokio::test]
    async fn test_mixed_transport_and_provider_failures() {
        let messenger = Arc::new(MockMessenger::with_scripts(vec![
            ChunkScript::TransportFail("timeout"),
            ChunkScript::Reject(vec!["client2@example.com"], "bounced"),
        ]));
        let engine = engine(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::addresses(4), "Subject", "Body")
            .with_chunk_size(2);
        let result = engine.dispatch(request).await.unwrap();

        assert_eq!(result.attempted, 4);
        assert_eq!(result.succeeded, 1);
        assert_eq!(result.failed.len(), 3);
        assert_eq!(result.outcome, DispatchOutcome::Partial);

        let transport_failures = result
            .failed
            .iter()
            .filter(|failure| failure.reason == FailureReason::TransportError)
            .count();
        let provider_failures = result
            .failed
            .iter()
            .filter(|failure| failure.reason == FailureReason::ProviderError)
            .count();
        assert_eq!(transport_failures, 2);
        assert_eq!(provider_failures, 1);
    }
}

// ============================================================================
// Cancellation Tests
// ============================================================================

mod cancellation_tests {
    use super::*;

    /// Messenger that fires a cancellation handle during its first call,
    /// simulating a caller cancelling while a chunk send is in flight.
    struct CancelAfterFirstChunk {
        inner: MockMessenger,
        cancel: CancelHandle,
    }

    #[async_trait]
    impl OutboundMessenger for CancelAfterFirstChunk {
        async fn send_chunk(
            &self,
            recipients: &[String],
            subject: &str,
            body: &str,
        ) -> Result<Vec<RecipientOutcome>, PortError> {
            self.cancel.cancel();
            self.inner.send_chunk(recipients, subject, body).await
        }
    }

    #[tokio::test]
    async fn test_cancel_before_start_sends_nothing_but_returns_a_result() {
        let messenger = Arc::new(MockMessenger::always_succeed());
        let engine = engine(messenger.clone());

        let cancel = CancelHandle::new();
        cancel.cancel();

        let request = DispatchRequest::new(RecipientFixtures::addresses(10), "Subject", "Body");
        let result = engine.dispatch_cancellable(request, &cancel).await.unwrap();

        assert_eq!(messenger.call_count(), 0);
        assert_eq!(result.attempted, 0);
        assert!(result.cancelled);
    }

    #[tokio::test]
    async fn test_cancel_between_chunks_keeps_completed_work() {
        init_tracing();
        let cancel = CancelHandle::new();
        let messenger = Arc::new(CancelAfterFirstChunk {
            inner: MockMessenger::always_succeed(),
            cancel: cancel.clone(),
        });
        let engine = DispatchEngine::new(messenger.clone());

        let request = DispatchRequest::new(RecipientFixtures::addresses(10), "Subject", "Body")
            .with_chunk_size(4);
        let result = engine.dispatch_cancellable(request, &cancel).await.unwrap();

        // First chunk completed before cancellation took effect; the
        // remaining chunks were never issued
        assert_eq!(messenger.inner.call_count(), 1);
        assert_eq!(result.attempted, 4);
        assert_eq!(result.succeeded, 4);
        assert!(result.cancelled);
        assert_eq!(result.outcome, DispatchOutcome::Success);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn attempted_equals_n_and_chunks_equal_ceil(
            n in 1usize..400,
            chunk_size in 1usize..120
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(async {
                let messenger = Arc::new(MockMessenger::always_succeed());
                let engine = DispatchEngine::new(messenger.clone());

                let request = DispatchRequest::new(
                    RecipientFixtures::addresses(n),
                    "Subject",
                    "Body",
                )
                .with_chunk_size(chunk_size);
                let result = engine.dispatch(request).await.unwrap();

                assert_eq!(result.attempted, n);
                assert_eq!(result.succeeded + result.failed.len(), n);
                assert_eq!(messenger.call_count(), n.div_ceil(chunk_size));
            });
        }
    }
}
