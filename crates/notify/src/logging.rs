//! `TracingNotifier`: delivers notifications by writing them to the log.

use async_trait::async_trait;
use tracing::info;

use crate::{Notification, Notifier, NotifyError};

/// Default notifier: emits every notification as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            rule_id = %notification.rule_id,
            ticket_id = %notification.ticket_id,
            "Notification sent: {}",
            notification.message
        );
        Ok(())
    }
}
