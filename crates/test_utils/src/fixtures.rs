//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the billing platform.
//! These fixtures are designed to be consistent and predictable for unit
//! tests.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, Rate};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard EUR amount
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }

    /// Unit price used by the reference line-item scenario
    pub fn eur_50() -> Money {
        Money::new(dec!(50.00), Currency::EUR)
    }

    /// A zero amount
    pub fn eur_zero() -> Money {
        Money::zero(Currency::EUR)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// The standard German VAT rate
    pub fn vat_19() -> Rate {
        Rate::from_percentage(dec!(19))
    }

    /// The reduced German VAT rate
    pub fn vat_7() -> Rate {
        Rate::from_percentage(dec!(7))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard issue date (Jan 1, 2024)
    pub fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Net 30 due date for the standard issue date
    pub fn net_30_due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    /// One day after the Net 30 due date
    pub fn day_after_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    /// Well before the due date
    pub fn early_january() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }
}

/// Fixture for recipient address lists
pub struct RecipientFixtures;

impl RecipientFixtures {
    /// Generates `n` syntactically valid, distinct addresses
    pub fn addresses(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("client{i}@example.com")).collect()
    }

    /// A single valid address
    pub fn single() -> Vec<String> {
        vec!["client@example.com".to_string()]
    }
}
