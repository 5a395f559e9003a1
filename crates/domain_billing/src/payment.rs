//! Payment methods and pay-link composition
//!
//! Each payment method is a tagged variant carrying only the fields that
//! method needs, validated at construction. Link composition is pure string
//! work: no network calls, no reachability checks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BillingError;

/// A payment method configured by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// PayPal.me style link
    Paypal { base_link: String },
    /// Stripe payment link
    StripeLink { base_link: String },
    /// Revolut payment link
    Revolut { base_link: String },
    /// Manual bank transfer; no online link, the payer follows the
    /// textual instructions instead
    BankTransfer {
        beneficiary: String,
        iban: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bic: Option<String>,
    },
}

impl PaymentMethod {
    /// Creates a PayPal method
    pub fn paypal(base_link: impl Into<String>) -> Result<Self, BillingError> {
        let base_link = require_link(base_link.into(), "PayPal")?;
        Ok(PaymentMethod::Paypal { base_link })
    }

    /// Creates a Stripe payment-link method
    pub fn stripe_link(base_link: impl Into<String>) -> Result<Self, BillingError> {
        let base_link = require_link(base_link.into(), "Stripe")?;
        Ok(PaymentMethod::StripeLink { base_link })
    }

    /// Creates a Revolut method
    pub fn revolut(base_link: impl Into<String>) -> Result<Self, BillingError> {
        let base_link = require_link(base_link.into(), "Revolut")?;
        Ok(PaymentMethod::Revolut { base_link })
    }

    /// Creates a bank-transfer method
    pub fn bank_transfer(
        beneficiary: impl Into<String>,
        iban: impl Into<String>,
    ) -> Result<Self, BillingError> {
        let beneficiary = beneficiary.into();
        let iban = iban.into();
        if beneficiary.trim().is_empty() {
            return Err(BillingError::validation("bank transfer requires a beneficiary"));
        }
        if iban.trim().is_empty() {
            return Err(BillingError::validation("bank transfer requires an IBAN"));
        }
        Ok(PaymentMethod::BankTransfer {
            beneficiary,
            iban,
            bic: None,
        })
    }

    /// Adds a BIC to a bank-transfer method
    pub fn with_bic(mut self, bic: impl Into<String>) -> Self {
        if let PaymentMethod::BankTransfer { bic: slot, .. } = &mut self {
            *slot = Some(bic.into());
        }
        self
    }

    /// The online base link, if this method has one
    pub fn base_link(&self) -> Option<&str> {
        match self {
            PaymentMethod::Paypal { base_link }
            | PaymentMethod::StripeLink { base_link }
            | PaymentMethod::Revolut { base_link } => Some(base_link),
            PaymentMethod::BankTransfer { .. } => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Paypal { .. } => write!(f, "PayPal"),
            PaymentMethod::StripeLink { .. } => write!(f, "Stripe link"),
            PaymentMethod::Revolut { .. } => write!(f, "Revolut"),
            PaymentMethod::BankTransfer { .. } => write!(f, "Bank transfer"),
        }
    }
}

fn require_link(base_link: String, provider: &str) -> Result<String, BillingError> {
    if base_link.trim().is_empty() {
        return Err(BillingError::validation(format!(
            "{provider} method requires a non-empty base link"
        )));
    }
    Ok(base_link)
}

/// Composes the per-invoice pay link for a payment method.
///
/// Returns `None` for bank transfer (no online link) or when the stored base
/// link is empty (possible in records predating construction-time
/// validation). The invoice number rides along as the `invoice` query
/// parameter, appended with `?` or `&` depending on whether the base link
/// already carries a query string.
pub fn compose_payment_link(method: &PaymentMethod, invoice_number: &str) -> Option<String> {
    let base = method.base_link()?;
    if base.is_empty() {
        return None;
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    Some(format!("{base}{separator}invoice={invoice_number}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paypal_link_composition() {
        let method = PaymentMethod::paypal("https://paypal.me/acme").unwrap();
        assert_eq!(
            compose_payment_link(&method, "INV-007"),
            Some("https://paypal.me/acme?invoice=INV-007".to_string())
        );
    }

    #[test]
    fn test_link_with_existing_query_uses_ampersand() {
        let method = PaymentMethod::stripe_link("https://buy.stripe.com/x?locale=de").unwrap();
        assert_eq!(
            compose_payment_link(&method, "INV-007"),
            Some("https://buy.stripe.com/x?locale=de&invoice=INV-007".to_string())
        );
    }

    #[test]
    fn test_bank_transfer_has_no_link() {
        let method = PaymentMethod::bank_transfer("ACME GmbH", "DE02120300000000202051").unwrap();
        assert_eq!(compose_payment_link(&method, "INV-007"), None);
    }

    #[test]
    fn test_empty_base_link_rejected_at_construction() {
        assert!(matches!(
            PaymentMethod::paypal("  "),
            Err(BillingError::Validation(_))
        ));
        assert!(matches!(
            PaymentMethod::revolut(""),
            Err(BillingError::Validation(_))
        ));
    }

    #[test]
    fn test_stored_empty_link_yields_none() {
        // A record written before construction-time validation existed
        let method = PaymentMethod::Paypal {
            base_link: String::new(),
        };
        assert_eq!(compose_payment_link(&method, "INV-007"), None);
    }

    #[test]
    fn test_bank_transfer_requires_fields() {
        assert!(PaymentMethod::bank_transfer("", "DE02...").is_err());
        assert!(PaymentMethod::bank_transfer("ACME GmbH", " ").is_err());
    }

    #[test]
    fn test_serde_method_tags() {
        let method = PaymentMethod::stripe_link("https://buy.stripe.com/x").unwrap();
        let json = serde_json::to_string(&method).unwrap();
        assert!(json.contains("\"method\":\"stripe_link\""));

        let bank = PaymentMethod::bank_transfer("ACME GmbH", "DE02120300000000202051").unwrap();
        let json = serde_json::to_string(&bank).unwrap();
        assert!(json.contains("\"method\":\"bank_transfer\""));
        assert!(!json.contains("bic"));
    }
}
