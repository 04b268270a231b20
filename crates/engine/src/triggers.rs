//! Trigger detection for ticket edits.

use crate::models::{Ticket, Trigger};

/// Triggers raised by editing `previous` into `current`, in dispatch order.
///
/// Always starts with `ticket_updated`; `status_changed` and
/// `priority_changed` follow when those fields differ. Creation is not an
/// edit, so callers use `Trigger::TicketCreated` directly for new tickets.
pub fn detect_triggers(previous: &Ticket, current: &Ticket) -> Vec<Trigger> {
    let mut triggers = vec![Trigger::TicketUpdated];
    if previous.status != current.status {
        triggers.push(Trigger::StatusChanged);
    }
    if previous.priority != current.priority {
        triggers.push(Trigger::PriorityChanged);
    }
    triggers
}
