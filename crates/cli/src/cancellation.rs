//! CLI cancellation utilities.
//!
//! Responsibilities:
//! - Re-export the engine's cancellation token so commands and the engine
//!   observe the same Ctrl+C signal.
//! - Define a single, recognizable `Cancelled` error used to signal user-initiated
//!   cancellation (Ctrl+C/SIGINT) through `anyhow::Result`.
//! - Centralize cancellation message and Unix-standard SIGINT exit code (130).
//!
//! Does NOT handle:
//! - This module does not install signal handlers by itself.
//! - This module does not decide *when* to check for cancellation; callers must do so.

use std::fmt;

use routeros_engine::ReconcileError;

pub use routeros_engine::CancellationToken;

/// Standard Unix exit code for SIGINT: 128 + 2.
pub const SIGINT_EXIT_CODE: u8 = 130;

/// Marker error used to indicate user-driven cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Returns true if this anyhow error represents a cancellation, either the
/// CLI marker or an engine call that observed the token.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<Cancelled>()
            || matches!(
                cause.downcast_ref::<ReconcileError>(),
                Some(ReconcileError::Cancelled { .. })
            )
    })
}

/// Print standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}
