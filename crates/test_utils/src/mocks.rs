//! Mock collaborators
//!
//! Scripted stand-ins for the outbound-message and template-rendering
//! ports. `MockMessenger` consumes one script entry per chunk call and
//! records every call for assertions; once the script is exhausted, further
//! chunks succeed.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use core_kernel::PortError;
use domain_notify::{OutboundMessenger, RecipientOutcome, TemplateRenderer, TemplateVars};

/// Behavior of one chunk call
#[derive(Debug, Clone)]
pub enum ChunkScript {
    /// Accept every recipient
    Succeed,
    /// Fail the whole call at the transport level
    TransportFail(&'static str),
    /// Reach the provider, but reject the listed recipients
    Reject(Vec<&'static str>, &'static str),
}

/// One recorded chunk call
#[derive(Debug, Clone)]
pub struct RecordedChunk {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Scripted outbound messenger
#[derive(Default)]
pub struct MockMessenger {
    scripts: Mutex<VecDeque<ChunkScript>>,
    calls: Mutex<Vec<RecordedChunk>>,
}

impl MockMessenger {
    /// A messenger that accepts everything
    pub fn always_succeed() -> Self {
        Self::default()
    }

    /// A messenger that plays the given scripts in order, one per chunk,
    /// then succeeds
    pub fn with_scripts(scripts: Vec<ChunkScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All chunk calls recorded so far
    pub fn calls(&self) -> Vec<RecordedChunk> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of chunk calls recorded so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl OutboundMessenger for MockMessenger {
    async fn send_chunk(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Vec<RecipientOutcome>, PortError> {
        self.calls.lock().unwrap().push(RecordedChunk {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ChunkScript::Succeed);

        match script {
            ChunkScript::Succeed => Ok(recipients
                .iter()
                .map(RecipientOutcome::accepted)
                .collect()),
            ChunkScript::TransportFail(message) => Err(PortError::connection(message)),
            ChunkScript::Reject(rejected, reason) => Ok(recipients
                .iter()
                .map(|recipient| {
                    if rejected.contains(&recipient.as_str()) {
                        RecipientOutcome::rejected(recipient, reason)
                    } else {
                        RecipientOutcome::accepted(recipient)
                    }
                })
                .collect()),
        }
    }
}

/// Template renderer that echoes its inputs
///
/// Renders to `"[template_id] key=value ..."` so tests can assert on the
/// variables that reached the collaborator. Optionally fails for one
/// template id to exercise the fail-fast path.
#[derive(Default)]
pub struct MockRenderer {
    fail_on: Option<&'static str>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes rendering fail for the given template id
    pub fn failing_on(template_id: &'static str) -> Self {
        Self {
            fail_on: Some(template_id),
        }
    }
}

impl TemplateRenderer for MockRenderer {
    fn render(&self, template_id: &str, vars: &TemplateVars) -> Result<String, PortError> {
        if self.fail_on == Some(template_id) {
            return Err(PortError::not_found("Template", template_id));
        }
        let rendered_vars: Vec<String> = vars
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        Ok(format!("[{template_id}] {}", rendered_vars.join(" ")))
    }
}
