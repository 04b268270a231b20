//! Notifier-level error type.

use thiserror::Error;

/// Errors returned by a notifier's `deliver` method.
///
/// The caller uses the variant to decide what to do next:
/// - `Retryable`: the delivery channel is temporarily unavailable.
/// - `Fatal`:     the notification can never be delivered as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Transient failure; delivery may succeed later.
    #[error("retryable notification error: {0}")]
    Retryable(String),

    /// Permanent failure; do not try again.
    #[error("fatal notification error: {0}")]
    Fatal(String),
}
