//! Notification derivation
//!
//! Notifications are a pure projection of an invoice set at a civil date.
//! Nothing here is persisted or sent; re-running the derivation with the
//! same inputs always yields the same ordered output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{days_until, ClientId, InvoiceId};
use domain_billing::{Invoice, InvoiceStatus};

/// How many days before the due date an unpaid invoice becomes `DueSoon`
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

/// Kind of derived alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Overdue,
    DueSoon,
}

/// A derived, actionable alert for one invoice
///
/// Owns no lifecycle: recomputed on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub invoice_id: InvoiceId,
    pub invoice_number: String,
    pub client_id: ClientId,
    /// Human-readable summary for portal and reminder use
    pub message: String,
    /// The date driving urgency ordering (the invoice due date)
    pub urgency_date: NaiveDate,
    /// Exact day count until due; present for `DueSoon` only
    pub days_until_due: Option<i64>,
}

/// Derives the prioritized alert list for an invoice set.
///
/// One `Overdue` notification per unpaid invoice past its due date; one
/// `DueSoon` notification per pending invoice due within
/// [`DUE_SOON_WINDOW_DAYS`] days (inclusive of today). Ordered most
/// time-critical first: earliest due date leads, so the most overdue invoice
/// sorts before a mildly overdue one, and both sort before anything merely
/// due soon. Ties break on invoice id for determinism.
pub fn derive_notifications(invoices: &[Invoice], today: NaiveDate) -> Vec<Notification> {
    let mut notifications: Vec<Notification> = invoices
        .iter()
        .filter_map(|invoice| match invoice.status_as_of(today) {
            InvoiceStatus::Overdue => {
                let days_overdue = days_until(invoice.due_date, today);
                Some(Notification {
                    kind: NotificationKind::Overdue,
                    invoice_id: invoice.id,
                    invoice_number: invoice.invoice_number.clone(),
                    client_id: invoice.client_id,
                    message: overdue_message(&invoice.invoice_number, days_overdue),
                    urgency_date: invoice.due_date,
                    days_until_due: None,
                })
            }
            InvoiceStatus::Pending => {
                let days_left = days_until(today, invoice.due_date);
                if (0..=DUE_SOON_WINDOW_DAYS).contains(&days_left) {
                    Some(Notification {
                        kind: NotificationKind::DueSoon,
                        invoice_id: invoice.id,
                        invoice_number: invoice.invoice_number.clone(),
                        client_id: invoice.client_id,
                        message: due_soon_message(&invoice.invoice_number, days_left),
                        urgency_date: invoice.due_date,
                        days_until_due: Some(days_left),
                    })
                } else {
                    None
                }
            }
            InvoiceStatus::Paid => None,
        })
        .collect();

    notifications.sort_by(|a, b| {
        a.urgency_date
            .cmp(&b.urgency_date)
            .then_with(|| a.invoice_id.cmp(&b.invoice_id))
    });
    notifications
}

fn overdue_message(invoice_number: &str, days_overdue: i64) -> String {
    if days_overdue == 1 {
        format!("Invoice {invoice_number} is 1 day overdue")
    } else {
        format!("Invoice {invoice_number} is {days_overdue} days overdue")
    }
}

fn due_soon_message(invoice_number: &str, days_left: i64) -> String {
    match days_left {
        0 => format!("Invoice {invoice_number} is due today"),
        1 => format!("Invoice {invoice_number} is due tomorrow"),
        n => format!("Invoice {invoice_number} is due in {n} days"),
    }
}
