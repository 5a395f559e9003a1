//! Outbound collaborator ports
//!
//! The dispatch engine is agnostic to the delivery channel: the outbound
//! collaborator may be email, SMS, or push. One [`OutboundMessenger::send_chunk`]
//! call is one atomic provider interaction; it either fails at the transport
//! level (the whole call errors) or returns per-recipient outcomes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::PortError;

/// Per-recipient outcome reported by the provider for one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientOutcome {
    /// The recipient address
    pub recipient: String,
    /// Whether the provider accepted the message for this recipient
    pub status: RecipientStatus,
}

impl RecipientOutcome {
    /// An accepted recipient
    pub fn accepted(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            status: RecipientStatus::Accepted,
        }
    }

    /// A rejected recipient with a provider-supplied reason
    pub fn rejected(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            status: RecipientStatus::Rejected {
                reason: reason.into(),
            },
        }
    }
}

/// Acceptance state for a single recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum RecipientStatus {
    Accepted,
    Rejected { reason: String },
}

/// Outbound message collaborator consumed by the dispatch engine
///
/// A transport-level failure (network, outage, auth) is an `Err`; a call
/// that reaches the provider returns `Ok` with one outcome per recipient,
/// some of which may be rejections.
#[async_trait]
pub trait OutboundMessenger: Send + Sync {
    async fn send_chunk(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Vec<RecipientOutcome>, PortError>;
}

/// Variables supplied to the template rendering collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, replacing any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Template rendering collaborator
///
/// Turns a template id plus variables into a rendered message body. The core
/// supplies the variables (invoice number, amount, due date) but never
/// renders markup itself.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_id: &str, vars: &TemplateVars) -> Result<String, PortError>;
}
