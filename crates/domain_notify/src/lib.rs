//! Notification Domain - Alerts and Bulk Dispatch
//!
//! This crate turns invoice sets into actionable alerts and reliably
//! delivers messages to many recipients despite partial provider failures.
//!
//! # Components
//!
//! - [`notification`]: a pure projection from invoices to a prioritized,
//!   deterministic alert list (`overdue` / `due_soon`). No I/O, no state.
//! - [`dispatch`]: the bulk dispatch engine. Chunks a recipient list,
//!   invokes the outbound collaborator one chunk at a time, and aggregates
//!   transport and provider failures into a single structured result.
//! - [`reminders`]: the scheduler-facing pipeline wiring the two together
//!   through the template-rendering collaborator.
//!
//! # Failure model
//!
//! Pre-flight problems (empty subject or body, empty or malformed recipient
//! list, bad chunk configuration) are errors returned before anything is
//! sent. Send-time failures are data: each failed recipient appears in the
//! result with a `transport_error` or `provider_error` reason code, and the
//! overall outcome is `success`, `partial`, or `failed`.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod notification;
pub mod outbound;
pub mod reminders;

pub use config::DispatchConfig;
pub use dispatch::{
    CancelHandle, DispatchEngine, DispatchFailure, DispatchOutcome, DispatchRequest,
    DispatchResult, FailureReason,
};
pub use error::NotifyError;
pub use notification::{
    derive_notifications, Notification, NotificationKind, DUE_SOON_WINDOW_DAYS,
};
pub use outbound::{
    OutboundMessenger, RecipientOutcome, RecipientStatus, TemplateRenderer, TemplateVars,
};
pub use reminders::{ReminderOutcome, ReminderService, TEMPLATE_DUE_SOON, TEMPLATE_OVERDUE};
