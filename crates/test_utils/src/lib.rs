//! Test Utilities Crate
//!
//! Shared test infrastructure for the billing platform test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `mocks`: Scripted mock collaborators for the notification ports

pub mod builders;
pub mod fixtures;
pub mod mocks;

pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

use once_cell::sync::OnceCell;

static TRACING: OnceCell<()> = OnceCell::new();

/// Initializes test tracing once per process.
///
/// Honors `RUST_LOG`; silent by default so test output stays readable.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
