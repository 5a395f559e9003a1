//! Core Kernel - Foundational types and utilities for the billing platform
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money types with precise decimal arithmetic and half-away-from-zero
//!   rounding
//! - Civil-date helpers for due-date arithmetic
//! - Common identifiers and value objects
//! - Port infrastructure for external collaborators

pub mod identifiers;
pub mod money;
pub mod ports;
pub mod temporal;

pub use identifiers::{AccountId, ClientId, DispatchId, InvoiceId, LineItemId};
pub use money::{round2, Currency, Money, MoneyError, Rate};
pub use ports::PortError;
pub use temporal::{add_days, days_until, TemporalError};
