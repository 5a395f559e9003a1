//! Automated payment reminders
//!
//! Scheduler-facing pipeline: derive notifications over an account's
//! invoices, render each through the template collaborator, and hand the
//! recipients to the dispatch engine. Clients without contact addresses are
//! skipped with a log entry; a missing template aborts the run before any
//! send, consistent with the fail-fast configuration policy.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use core_kernel::{ClientId, InvoiceId};
use domain_billing::Invoice;

use crate::dispatch::{DispatchEngine, DispatchRequest, DispatchResult};
use crate::error::NotifyError;
use crate::notification::{derive_notifications, Notification, NotificationKind};
use crate::outbound::{TemplateRenderer, TemplateVars};

/// Template id for overdue reminders
pub const TEMPLATE_OVERDUE: &str = "reminder_overdue";
/// Template id for due-soon reminders
pub const TEMPLATE_DUE_SOON: &str = "reminder_due_soon";

/// One reminder that was dispatched during a run
#[derive(Debug, Clone)]
pub struct ReminderOutcome {
    pub notification: Notification,
    pub result: DispatchResult,
}

/// Derives and dispatches automated payment reminders
pub struct ReminderService {
    renderer: Arc<dyn TemplateRenderer>,
    engine: DispatchEngine,
}

impl ReminderService {
    pub fn new(renderer: Arc<dyn TemplateRenderer>, engine: DispatchEngine) -> Self {
        Self { renderer, engine }
    }

    /// Runs one reminder cycle over an invoice set.
    ///
    /// `contacts` maps each client to its reminder addresses. Returns one
    /// outcome per dispatched notification, in urgency order.
    pub async fn run(
        &self,
        invoices: &[Invoice],
        contacts: &HashMap<ClientId, Vec<String>>,
        today: NaiveDate,
    ) -> Result<Vec<ReminderOutcome>, NotifyError> {
        let by_id: HashMap<InvoiceId, &Invoice> =
            invoices.iter().map(|invoice| (invoice.id, invoice)).collect();

        let mut outcomes = Vec::new();
        for notification in derive_notifications(invoices, today) {
            let addresses = match contacts.get(&notification.client_id) {
                Some(addresses) if !addresses.is_empty() => addresses.clone(),
                _ => {
                    tracing::warn!(
                        invoice = %notification.invoice_number,
                        client = %notification.client_id,
                        "no contact addresses for client, skipping reminder"
                    );
                    continue;
                }
            };

            // The invoice is always present: the notification came from it
            let invoice = by_id[&notification.invoice_id];
            let template_id = match notification.kind {
                NotificationKind::Overdue => TEMPLATE_OVERDUE,
                NotificationKind::DueSoon => TEMPLATE_DUE_SOON,
            };
            let vars = TemplateVars::new()
                .with("invoice_number", &notification.invoice_number)
                .with("amount", invoice.totals.total.to_string())
                .with("due_date", invoice.due_date.to_string())
                .with("message", &notification.message);

            let body = self
                .renderer
                .render(template_id, &vars)
                .map_err(NotifyError::Template)?;
            let subject = format!("Payment reminder: {}", notification.invoice_number);

            let result = self
                .engine
                .dispatch(DispatchRequest::new(addresses, subject, body))
                .await?;
            outcomes.push(ReminderOutcome {
                notification,
                result,
            });
        }
        Ok(outcomes)
    }
}
