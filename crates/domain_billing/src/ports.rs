//! Billing domain ports
//!
//! The core never assumes a specific storage engine; the surrounding
//! platform provides an adapter implementing [`InvoiceStore`].

use async_trait::async_trait;

use core_kernel::{AccountId, PortError};

use crate::invoice::Invoice;

/// Persistence collaborator for invoices
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Loads all invoices owned by an account
    async fn load_invoices(&self, account_id: AccountId) -> Result<Vec<Invoice>, PortError>;

    /// Persists an invoice, inserting or replacing by id
    async fn save_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;
}
