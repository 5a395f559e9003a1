//! Invoice lifecycle management
//!
//! This module owns invoice totals, due-date resolution, and the
//! pending/overdue/paid lifecycle. Two rules shape the design:
//!
//! - Totals and due dates are recomputed whenever their inputs change.
//!   A stored total that disagrees with the line items, or a stale due date
//!   after the issue date moved, is a correctness bug.
//! - `Overdue` is a view, not a stored fact. The persisted status is only
//!   ever `Pending` or `Paid`; [`derive_status`] projects `Overdue` from the
//!   due date and the current civil date.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{add_days, AccountId, ClientId, InvoiceId, LineItemId, Money, Rate};

use crate::error::BillingError;

/// Named due-date policy for an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerms {
    #[serde(rename = "Net 7")]
    Net7,
    #[serde(rename = "Net 14")]
    Net14,
    #[serde(rename = "Net 30")]
    Net30,
    /// Caller supplies the due date explicitly
    Custom,
}

impl PaymentTerms {
    /// Returns the number of calendar days granted by this term,
    /// or `None` for `Custom`
    pub fn days(&self) -> Option<i64> {
        match self {
            PaymentTerms::Net7 => Some(7),
            PaymentTerms::Net14 => Some(14),
            PaymentTerms::Net30 => Some(30),
            PaymentTerms::Custom => None,
        }
    }
}

impl fmt::Display for PaymentTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTerms::Net7 => write!(f, "Net 7"),
            PaymentTerms::Net14 => write!(f, "Net 14"),
            PaymentTerms::Net30 => write!(f, "Net 30"),
            PaymentTerms::Custom => write!(f, "Custom"),
        }
    }
}

/// Invoice status
///
/// Only `Pending` and `Paid` are ever persisted; `Overdue` exists as the
/// output of [`derive_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

/// A line item on an invoice
///
/// Insertion order is preserved; totals are independent of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Item ID
    pub id: LineItemId,
    /// Description shown to the client
    pub description: String,
    /// Quantity (must be non-negative)
    pub quantity: Decimal,
    /// Unit price (must be non-negative)
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a new line item with quantity 1
    pub fn new(description: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id: LineItemId::new(),
            description: description.into(),
            quantity: Decimal::ONE,
            unit_price,
        }
    }

    /// Sets the quantity
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Gross amount for this line, at full precision
    pub fn amount(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Derived invoice totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub vat_amount: Money,
    pub total: Money,
}

/// Computes subtotal, VAT amount, and total for a set of line items.
///
/// The subtotal is accumulated at full decimal precision; VAT and total are
/// computed from the exact subtotal and rounded once, half away from zero.
///
/// # Errors
///
/// Returns [`BillingError::Validation`] when `items` is empty, when any
/// quantity or unit price is negative, or when the VAT rate is negative.
pub fn compute_totals(items: &[LineItem], vat_rate: Rate) -> Result<InvoiceTotals, BillingError> {
    let first = items
        .first()
        .ok_or_else(|| BillingError::validation("invoice must have at least one line item"))?;

    if vat_rate.is_negative() {
        return Err(BillingError::validation("VAT rate must not be negative"));
    }

    let currency = first.unit_price.currency();
    let mut subtotal = Money::zero(currency);
    for item in items {
        if item.quantity.is_sign_negative() {
            return Err(BillingError::validation(format!(
                "negative quantity on line item '{}'",
                item.description
            )));
        }
        if item.unit_price.is_negative() {
            return Err(BillingError::validation(format!(
                "negative unit price on line item '{}'",
                item.description
            )));
        }
        subtotal = subtotal.checked_add(&item.amount())?;
    }

    let vat_amount = vat_rate.apply(&subtotal);
    let total = subtotal.checked_add(&vat_amount)?;

    Ok(InvoiceTotals {
        subtotal: subtotal.round2(),
        vat_amount: vat_amount.round2(),
        total: total.round2(),
    })
}

/// Resolves the due date for an invoice.
///
/// For `Custom` terms the caller-supplied date passes through unchanged.
/// For any net term the due date is always `issue_date + N` calendar days;
/// a previously stored due date is never consulted.
pub fn resolve_due_date(
    issue_date: NaiveDate,
    terms: PaymentTerms,
    explicit_due_date: Option<NaiveDate>,
) -> Result<NaiveDate, BillingError> {
    match terms.days() {
        Some(days) => Ok(add_days(issue_date, days)?),
        None => explicit_due_date
            .ok_or_else(|| BillingError::validation("custom terms require an explicit due date")),
    }
}

/// Projects the effective status of an invoice at a given civil date.
///
/// Pure: depends only on its arguments. `Paid` is terminal and never
/// overridden by the passage of time. Any unpaid invoice past its due date
/// reads as `Overdue`; the stored status is not updated.
pub fn derive_status(
    stored_status: InvoiceStatus,
    due_date: NaiveDate,
    today: NaiveDate,
) -> InvoiceStatus {
    if stored_status == InvoiceStatus::Paid {
        return InvoiceStatus::Paid;
    }
    if today > due_date {
        InvoiceStatus::Overdue
    } else {
        InvoiceStatus::Pending
    }
}

/// An invoice issued by an account to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Invoice number (human-readable)
    pub invoice_number: String,
    /// Owning account
    pub account_id: AccountId,
    /// Billed client
    pub client_id: ClientId,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Due date, always consistent with `payment_terms`
    pub due_date: NaiveDate,
    /// Due-date policy
    pub payment_terms: PaymentTerms,
    /// VAT rate applied to the subtotal
    pub vat_rate: Rate,
    /// Line items, insertion order preserved
    pub items: Vec<LineItem>,
    /// Derived totals, always consistent with `items` and `vat_rate`
    pub totals: InvoiceTotals,
    /// Persisted status (`Pending` or `Paid` only)
    pub status: InvoiceStatus,
    /// When payment was confirmed
    pub paid_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new pending invoice.
    ///
    /// Totals and due date are computed from the arguments; `explicit_due_date`
    /// is required for (and only consulted with) `Custom` terms.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: AccountId,
        client_id: ClientId,
        issue_date: NaiveDate,
        payment_terms: PaymentTerms,
        explicit_due_date: Option<NaiveDate>,
        vat_rate: Rate,
        items: Vec<LineItem>,
    ) -> Result<Self, BillingError> {
        let totals = compute_totals(&items, vat_rate)?;
        let due_date = resolve_due_date(issue_date, payment_terms, explicit_due_date)?;
        let now = Utc::now();

        Ok(Self {
            id: InvoiceId::new_v7(),
            invoice_number: generate_invoice_number(),
            account_id,
            client_id,
            issue_date,
            due_date,
            payment_terms,
            vat_rate,
            items,
            totals,
            status: InvoiceStatus::Pending,
            paid_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the line items and recomputes totals
    pub fn set_items(&mut self, items: Vec<LineItem>) -> Result<(), BillingError> {
        self.totals = compute_totals(&items, self.vat_rate)?;
        self.items = items;
        self.touch();
        Ok(())
    }

    /// Changes the VAT rate and recomputes totals
    pub fn set_vat_rate(&mut self, vat_rate: Rate) -> Result<(), BillingError> {
        let totals = compute_totals(&self.items, vat_rate)?;
        self.vat_rate = vat_rate;
        self.totals = totals;
        self.touch();
        Ok(())
    }

    /// Moves the issue date, recomputing the due date under net terms.
    ///
    /// Under `Custom` terms the explicit due date is left alone.
    pub fn set_issue_date(&mut self, issue_date: NaiveDate) -> Result<(), BillingError> {
        if self.payment_terms != PaymentTerms::Custom {
            self.due_date = resolve_due_date(issue_date, self.payment_terms, None)?;
        }
        self.issue_date = issue_date;
        self.touch();
        Ok(())
    }

    /// Changes the payment terms, recomputing the due date.
    ///
    /// Moving away from `Custom` always recomputes from the issue date, so a
    /// stale custom due date cannot survive the change. Moving to `Custom`
    /// requires an explicit date.
    pub fn set_payment_terms(
        &mut self,
        terms: PaymentTerms,
        explicit_due_date: Option<NaiveDate>,
    ) -> Result<(), BillingError> {
        self.due_date = resolve_due_date(self.issue_date, terms, explicit_due_date)?;
        self.payment_terms = terms;
        self.touch();
        Ok(())
    }

    /// Sets an explicit due date under `Custom` terms
    pub fn set_custom_due_date(&mut self, due_date: NaiveDate) -> Result<(), BillingError> {
        if self.payment_terms != PaymentTerms::Custom {
            return Err(BillingError::validation(
                "explicit due dates are only allowed under custom terms",
            ));
        }
        self.due_date = due_date;
        self.touch();
        Ok(())
    }

    /// Records payment confirmation.
    ///
    /// Idempotent: confirming an already-paid invoice is a no-op success so
    /// that at-least-once payment webhooks can be replayed safely.
    pub fn mark_paid(&mut self) -> Result<(), BillingError> {
        if self.status == InvoiceStatus::Paid {
            tracing::debug!(invoice = %self.invoice_number, "mark_paid on already-paid invoice, ignoring");
            return Ok(());
        }
        self.status = InvoiceStatus::Paid;
        self.paid_at = Some(Utc::now());
        self.touch();
        Ok(())
    }

    /// Administrative reversal of a payment confirmation.
    ///
    /// Never invoked by automatic logic; exists for operator correction of a
    /// mistaken confirmation.
    pub fn reopen(&mut self) -> Result<(), BillingError> {
        if self.status != InvoiceStatus::Paid {
            return Err(BillingError::invalid_transition(format!(
                "cannot reopen invoice {} in status {:?}",
                self.invoice_number, self.status
            )));
        }
        self.status = InvoiceStatus::Pending;
        self.paid_at = None;
        self.touch();
        Ok(())
    }

    /// Effective status at the given civil date
    pub fn status_as_of(&self, today: NaiveDate) -> InvoiceStatus {
        derive_status(self.status, self.due_date, today)
    }

    /// True if the invoice is unpaid and past due at the given date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status_as_of(today) == InvoiceStatus::Overdue
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Generates a unique invoice number
fn generate_invoice_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("INV-{}", duration.as_millis() % 10_000_000_000)
}
