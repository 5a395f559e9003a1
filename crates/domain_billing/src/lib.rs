//! Billing Domain - Invoice Lifecycle and Payment Links
//!
//! This crate owns the invoice lifecycle for the billing platform:
//!
//! - Totals: `subtotal = Σ quantity·price`,
//!   `total = round2(subtotal + subtotal·vat/100)`, computed on exact
//!   decimals and rounded once.
//! - Due dates: net payment terms (`Net 7/14/30`) always derive the due date
//!   from the issue date; `Custom` terms carry an explicit date.
//! - Status: the only persisted transition is `pending/overdue → paid`
//!   (idempotent); `overdue` is derived from the due date at read time, never
//!   stored.
//! - Payment links: per-invoice pay links composed from a provider base link,
//!   with bank transfer deliberately link-less.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{Invoice, LineItem, PaymentTerms, compute_totals};
//!
//! let invoice = Invoice::new(
//!     account_id, client_id, issue_date,
//!     PaymentTerms::Net30, None, vat_rate, items,
//! )?;
//! assert_eq!(invoice.status_as_of(today), InvoiceStatus::Pending);
//! ```

pub mod error;
pub mod invoice;
pub mod payment;
pub mod ports;

pub use error::BillingError;
pub use invoice::{
    compute_totals, derive_status, resolve_due_date, Invoice, InvoiceStatus, InvoiceTotals,
    LineItem, PaymentTerms,
};
pub use payment::{compose_payment_link, PaymentMethod};
pub use ports::InvoiceStore;
