//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for everything
//! else.

use chrono::NaiveDate;
use core_kernel::{AccountId, ClientId, Money, Rate};
use rust_decimal::Decimal;

use domain_billing::{Invoice, LineItem, PaymentTerms};

use crate::fixtures::{MoneyFixtures, TemporalFixtures};

/// Builder for test invoices
pub struct InvoiceBuilder {
    account_id: AccountId,
    client_id: ClientId,
    issue_date: NaiveDate,
    payment_terms: PaymentTerms,
    explicit_due_date: Option<NaiveDate>,
    vat_rate: Rate,
    items: Vec<LineItem>,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Creates a builder for a Net 30 invoice with one 100.00 EUR line
    pub fn new() -> Self {
        Self {
            account_id: AccountId::new(),
            client_id: ClientId::new(),
            issue_date: TemporalFixtures::issue_date(),
            payment_terms: PaymentTerms::Net30,
            explicit_due_date: None,
            vat_rate: MoneyFixtures::vat_19(),
            items: vec![LineItem::new("Consulting", MoneyFixtures::eur_100())],
        }
    }

    /// Sets the owning account
    pub fn with_account_id(mut self, id: AccountId) -> Self {
        self.account_id = id;
        self
    }

    /// Sets the billed client
    pub fn with_client_id(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    /// Sets the issue date
    pub fn with_issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = date;
        self
    }

    /// Sets net payment terms
    pub fn with_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = terms;
        self
    }

    /// Sets custom terms with an explicit due date
    pub fn with_custom_due_date(mut self, due_date: NaiveDate) -> Self {
        self.payment_terms = PaymentTerms::Custom;
        self.explicit_due_date = Some(due_date);
        self
    }

    /// Sets the VAT rate
    pub fn with_vat_rate(mut self, rate: Rate) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Replaces the line items
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Adds one line item
    pub fn with_line(mut self, description: &str, quantity: Decimal, unit_price: Money) -> Self {
        self.items
            .push(LineItem::new(description, unit_price).with_quantity(quantity));
        self
    }

    /// Builds the invoice, panicking on invalid test data
    pub fn build(self) -> Invoice {
        Invoice::new(
            self.account_id,
            self.client_id,
            self.issue_date,
            self.payment_terms,
            self.explicit_due_date,
            self.vat_rate,
            self.items,
        )
        .expect("InvoiceBuilder produced invalid invoice data")
    }
}
