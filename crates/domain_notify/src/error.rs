//! Notification domain errors
//!
//! Only pre-flight conditions surface as errors: malformed requests and
//! missing configuration fail fast before anything is sent. Send-time
//! failures (transport outages, provider rejections) are absorbed into the
//! aggregated dispatch result and never propagate as errors.

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the notification domain
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Malformed input, rejected before any send attempt
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or inconsistent configuration, rejected before any send attempt
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The template rendering collaborator failed
    #[error("Template rendering failed: {0}")]
    Template(#[source] PortError),
}

impl NotifyError {
    pub fn validation(message: impl Into<String>) -> Self {
        NotifyError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        NotifyError::Configuration(message.into())
    }
}
