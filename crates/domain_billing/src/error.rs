//! Billing domain errors

use core_kernel::{MoneyError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Malformed input, rejected before any state change
    #[error("Validation error: {0}")]
    Validation(String),

    /// An illegal lifecycle transition was requested
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Money arithmetic failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Date arithmetic failed
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        BillingError::InvalidTransition(message.into())
    }
}
