//! The `Notifier` trait: the contract every delivery channel must fulfil.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::NotifyError;

/// A message produced by a `send_notification` action.
///
/// Defined here (in the notify crate) so both the engine and individual
/// notifier implementations can import it without a circular dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Rule whose action produced the notification.
    pub rule_id: String,
    /// Ticket the rule fired for.
    pub ticket_id: String,
    /// Free-text message taken verbatim from the action value.
    pub message: String,
}

impl Notification {
    pub fn new(
        rule_id: impl Into<String>,
        ticket_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            ticket_id: ticket_id.into(),
            message: message.into(),
        }
    }
}

/// The core delivery trait.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single notification.
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;
}
