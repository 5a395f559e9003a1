//! Bulk dispatch engine
//!
//! Sends one message to many recipients through the outbound collaborator,
//! in bounded chunks, strictly sequentially. The engine owns the only
//! retry/partial-failure logic in the system:
//!
//! - Pre-flight validation fails fast with zero sends.
//! - A transport-level chunk failure marks every recipient in that chunk
//!   failed and the loop moves on to the next chunk.
//! - A provider-level rejection marks only the rejected recipients failed.
//! - All chunks are attempted; a chunk failure never aborts the dispatch.
//! - Cancellation is honored between chunks: no new chunk is sent after the
//!   handle fires, but the aggregate for already-attempted chunks is still
//!   returned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use validator::ValidateEmail;

use core_kernel::DispatchId;

use crate::config::DispatchConfig;
use crate::error::NotifyError;
use crate::outbound::{OutboundMessenger, RecipientStatus};

/// A one-shot request to send one message to many recipients
///
/// Ephemeral: created per call, consumed once, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Recipient addresses, in send order
    pub recipients: Vec<String>,
    /// Message subject
    pub subject: String,
    /// Rendered message body
    pub body: String,
    /// Requested chunk size; engine default applies when absent
    pub chunk_size: Option<usize>,
}

impl DispatchRequest {
    /// Creates a request using the engine's default chunk size
    pub fn new(
        recipients: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipients,
            subject: subject.into(),
            body: body.into(),
            chunk_size: None,
        }
    }

    /// Requests a specific chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }
}

/// Reason code for a failed recipient, decoupled from any provider's
/// response format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The whole chunk call failed (network, outage, auth)
    TransportError,
    /// The provider rejected this specific recipient
    ProviderError,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::TransportError => write!(f, "transport_error"),
            FailureReason::ProviderError => write!(f, "provider_error"),
        }
    }
}

/// One failed recipient within a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub recipient: String,
    pub reason: FailureReason,
    /// Collaborator-supplied detail, for operator visibility only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Overall outcome of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success,
    Partial,
    Failed,
}

/// Aggregated result of one dispatch
///
/// A `Partial` outcome is always distinguishable from `Success`, so callers
/// can warn the operator and surface the specific failing recipients instead
/// of reporting a false "all sent".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub id: DispatchId,
    /// Recipients actually handed to the outbound collaborator
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<DispatchFailure>,
    pub outcome: DispatchOutcome,
    /// True when the dispatch was cancelled before all chunks were attempted
    pub cancelled: bool,
}

/// Cooperative cancellation handle for an in-flight dispatch
///
/// The engine checks the handle between chunks; cancellation never discards
/// work already attempted.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; takes effect before the next chunk
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The bulk dispatch engine
///
/// One engine may serve many concurrent dispatch requests; each request's
/// own chunk loop is strictly sequential to respect provider throughput
/// limits and bound the blast radius of an outage to one chunk.
pub struct DispatchEngine {
    messenger: Arc<dyn OutboundMessenger>,
    config: DispatchConfig,
}

impl DispatchEngine {
    /// Creates an engine with default configuration
    pub fn new(messenger: Arc<dyn OutboundMessenger>) -> Self {
        Self {
            messenger,
            config: DispatchConfig::default(),
        }
    }

    /// Creates an engine with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when the configuration is
    /// internally inconsistent.
    pub fn with_config(
        messenger: Arc<dyn OutboundMessenger>,
        config: DispatchConfig,
    ) -> Result<Self, NotifyError> {
        config.validate()?;
        Ok(Self { messenger, config })
    }

    /// Dispatches a request to completion
    pub async fn dispatch(&self, request: DispatchRequest) -> Result<DispatchResult, NotifyError> {
        self.dispatch_cancellable(request, &CancelHandle::new())
            .await
    }

    /// Dispatches a request, honoring a cancellation handle between chunks
    pub async fn dispatch_cancellable(
        &self,
        request: DispatchRequest,
        cancel: &CancelHandle,
    ) -> Result<DispatchResult, NotifyError> {
        self.preflight(&request)?;
        let chunk_size = self.effective_chunk_size(&request)?;

        let id = DispatchId::new_v7();
        let total = request.recipients.len();
        tracing::debug!(
            dispatch = %id,
            recipients = total,
            chunk_size,
            "starting dispatch"
        );

        let mut attempted = 0usize;
        let mut failed: Vec<DispatchFailure> = Vec::new();
        let mut cancelled = false;

        for chunk in request.recipients.chunks(chunk_size) {
            if cancel.is_cancelled() {
                cancelled = true;
                tracing::info!(
                    dispatch = %id,
                    attempted,
                    remaining = total - attempted,
                    "dispatch cancelled between chunks"
                );
                break;
            }

            attempted += chunk.len();
            match self
                .messenger
                .send_chunk(chunk, &request.subject, &request.body)
                .await
            {
                Ok(outcomes) => {
                    for outcome in outcomes {
                        if let RecipientStatus::Rejected { reason } = outcome.status {
                            failed.push(DispatchFailure {
                                recipient: outcome.recipient,
                                reason: FailureReason::ProviderError,
                                detail: Some(reason),
                            });
                        }
                    }
                }
                Err(error) => {
                    // Whole chunk lost; record every recipient and move on
                    tracing::warn!(
                        dispatch = %id,
                        chunk_len = chunk.len(),
                        error = %error,
                        "chunk send failed at transport level"
                    );
                    let detail = error.to_string();
                    failed.extend(chunk.iter().map(|recipient| DispatchFailure {
                        recipient: recipient.clone(),
                        reason: FailureReason::TransportError,
                        detail: Some(detail.clone()),
                    }));
                }
            }
        }

        let succeeded = attempted - failed.len();
        let outcome = if failed.is_empty() {
            DispatchOutcome::Success
        } else if failed.len() < attempted {
            DispatchOutcome::Partial
        } else {
            DispatchOutcome::Failed
        };

        tracing::info!(
            dispatch = %id,
            attempted,
            succeeded,
            failed = failed.len(),
            ?outcome,
            cancelled,
            "dispatch finished"
        );

        Ok(DispatchResult {
            id,
            attempted,
            succeeded,
            failed,
            outcome,
            cancelled,
        })
    }

    /// Validates a request before anything is sent
    fn preflight(&self, request: &DispatchRequest) -> Result<(), NotifyError> {
        if request.subject.trim().is_empty() {
            return Err(NotifyError::configuration(
                "dispatch subject must not be empty",
            ));
        }
        if request.body.trim().is_empty() {
            return Err(NotifyError::configuration("dispatch body must not be empty"));
        }
        if request.recipients.is_empty() {
            return Err(NotifyError::validation(
                "dispatch requires at least one recipient",
            ));
        }
        for recipient in &request.recipients {
            if !recipient.validate_email() {
                return Err(NotifyError::validation(format!(
                    "invalid recipient address: {recipient}"
                )));
            }
        }
        Ok(())
    }

    fn effective_chunk_size(&self, request: &DispatchRequest) -> Result<usize, NotifyError> {
        match request.chunk_size {
            Some(0) => Err(NotifyError::configuration(
                "requested chunk size must be at least 1",
            )),
            Some(n) => Ok(n.min(self.config.max_chunk_size)),
            None => Ok(self.config.default_chunk_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_handle() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());

        let other = handle.clone();
        other.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_failure_reason_serde_codes() {
        let json = serde_json::to_string(&FailureReason::TransportError).unwrap();
        assert_eq!(json, "\"transport_error\"");
        let json = serde_json::to_string(&FailureReason::ProviderError).unwrap();
        assert_eq!(json, "\"provider_error\"");
    }

    #[test]
    fn test_request_builder() {
        let request = DispatchRequest::new(
            vec!["a@example.com".to_string()],
            "Subject",
            "Body",
        )
        .with_chunk_size(10);
        assert_eq!(request.chunk_size, Some(10));
    }
}
