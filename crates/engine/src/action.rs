//! Action execution: applies one mutation to a ticket snapshot.
//!
//! [`apply`] never mutates its input: it clones the ticket, mutates the clone
//! and hands it back together with an [`ActionEffect`] describing what
//! happened. Every call refreshes `updated_at`, including for notifications
//! and unsupported actions.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Action, ActionType, Priority, Status, Ticket};

/// Why an action could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedAction {
    #[error("unknown action type '{0}'")]
    UnknownType(String),

    #[error("'{0}' is not a valid ticket status")]
    InvalidStatus(String),

    #[error("'{0}' is not a valid ticket priority")]
    InvalidPriority(String),
}

/// What applying an action did, besides refreshing `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// A field mutation ran. Includes legal no-ops such as re-adding a tag
    /// or escalating a critical ticket.
    Applied,
    /// `send_notification` ran; the message still has to be delivered.
    Notified(String),
    /// Nothing changed; the caller decides whether that matters.
    Unsupported(UnsupportedAction),
}

/// A ticket snapshot after one action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub ticket: Ticket,
    pub effect: ActionEffect,
}

/// Apply `action` to `ticket`, stamping the result with the current time.
pub fn apply(ticket: &Ticket, action: &Action) -> ActionOutcome {
    apply_at(ticket, action, Utc::now())
}

/// Same as [`apply`] with an explicit execution time.
pub fn apply_at(ticket: &Ticket, action: &Action, now: DateTime<Utc>) -> ActionOutcome {
    let mut updated = ticket.clone();

    let effect = match &action.kind {
        ActionType::Assign => {
            updated.assignee = Some(action.value.clone());
            ActionEffect::Applied
        }
        ActionType::ChangeStatus => match action.value.parse::<Status>() {
            Ok(status) => {
                updated.status = status;
                ActionEffect::Applied
            }
            Err(_) => ActionEffect::Unsupported(UnsupportedAction::InvalidStatus(
                action.value.clone(),
            )),
        },
        ActionType::ChangePriority => match action.value.parse::<Priority>() {
            Ok(priority) => {
                updated.priority = priority;
                ActionEffect::Applied
            }
            Err(_) => ActionEffect::Unsupported(UnsupportedAction::InvalidPriority(
                action.value.clone(),
            )),
        },
        ActionType::AddTag => {
            updated.tags.insert(action.value.clone());
            ActionEffect::Applied
        }
        ActionType::Escalate => {
            updated.priority = updated.priority.escalated();
            ActionEffect::Applied
        }
        ActionType::SendNotification => ActionEffect::Notified(action.value.clone()),
        ActionType::Other(kind) => {
            ActionEffect::Unsupported(UnsupportedAction::UnknownType(kind.clone()))
        }
    };

    updated.touch(now);
    ActionOutcome { ticket: updated, effect }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ticket() -> Ticket {
        Ticket::new("ticket_1", "Laptop will not boot", "User")
    }

    fn later(t: &Ticket) -> DateTime<Utc> {
        t.created_at + Duration::minutes(5)
    }

    #[test]
    fn assign_sets_value_verbatim_including_empty() {
        let t = ticket();
        let out = apply(&t, &Action::new(ActionType::Assign, "Senior Support Team"));
        assert_eq!(out.ticket.assignee.as_deref(), Some("Senior Support Team"));
        assert_eq!(out.effect, ActionEffect::Applied);

        let out = apply(&out.ticket, &Action::new(ActionType::Assign, ""));
        assert_eq!(out.ticket.assignee.as_deref(), Some(""));
    }

    #[test]
    fn input_ticket_is_left_untouched() {
        let t = ticket();
        let before = t.clone();
        let _ = apply_at(&t, &Action::new(ActionType::AddTag, "vip"), later(&t));
        assert_eq!(t, before);
    }

    #[test]
    fn change_status_and_priority_parse_their_payloads() {
        let t = ticket();
        let out = apply(&t, &Action::new(ActionType::ChangeStatus, "in_progress"));
        assert_eq!(out.ticket.status, Status::InProgress);

        let out = apply(&out.ticket, &Action::new(ActionType::ChangePriority, "low"));
        assert_eq!(out.ticket.priority, Priority::Low);
    }

    #[test]
    fn malformed_enum_payload_is_reported_and_leaves_field_alone() {
        let t = ticket();
        let out = apply_at(&t, &Action::new(ActionType::ChangeStatus, "pending"), later(&t));
        assert_eq!(out.ticket.status, Status::Open);
        assert_eq!(
            out.effect,
            ActionEffect::Unsupported(UnsupportedAction::InvalidStatus("pending".into()))
        );
        assert_eq!(out.ticket.updated_at, later(&t));

        let out = apply(&t, &Action::new(ActionType::ChangePriority, "urgent"));
        assert_eq!(out.ticket.priority, Priority::Medium);
        assert!(matches!(
            out.effect,
            ActionEffect::Unsupported(UnsupportedAction::InvalidPriority(_))
        ));
    }

    #[test]
    fn add_tag_is_idempotent() {
        let t = ticket();
        let tag = Action::new(ActionType::AddTag, "a");
        let once = apply(&t, &tag).ticket;
        let twice = apply(&once, &tag).ticket;
        assert_eq!(twice.tags.iter().filter(|x| *x == "a").count(), 1);
        assert_eq!(twice.tags.len(), 1);
    }

    #[test]
    fn escalate_steps_once_and_stops_at_critical() {
        let mut t = ticket();
        t.priority = Priority::Low;
        let escalate = Action::new(ActionType::Escalate, "");
        let out = apply(&t, &escalate);
        assert_eq!(out.ticket.priority, Priority::Medium);

        t.priority = Priority::Critical;
        let out = apply(&t, &escalate);
        assert_eq!(out.ticket.priority, Priority::Critical);
        assert_eq!(out.effect, ActionEffect::Applied);
    }

    #[test]
    fn notification_changes_nothing_but_the_timestamp() {
        let t = ticket();
        let now = later(&t);
        let out = apply_at(&t, &Action::new(ActionType::SendNotification, "CAB Team"), now);
        assert_eq!(out.effect, ActionEffect::Notified("CAB Team".into()));

        let mut expected = t.clone();
        expected.updated_at = now;
        assert_eq!(out.ticket, expected);
    }

    #[test]
    fn unknown_action_passes_ticket_through() {
        let t = ticket();
        let out = apply(&t, &Action::new(ActionType::Other("reopen".into()), "x"));
        assert_eq!(
            out.effect,
            ActionEffect::Unsupported(UnsupportedAction::UnknownType("reopen".into()))
        );
        assert_eq!(out.ticket.status, t.status);
        assert_eq!(out.ticket.tags, t.tags);
    }

    #[test]
    fn every_apply_refreshes_updated_at() {
        let t = ticket();
        let now = later(&t);
        let out = apply_at(&t, &Action::new(ActionType::Escalate, ""), now);
        assert_eq!(out.ticket.updated_at, now);
        assert!(out.ticket.updated_at >= out.ticket.created_at);
    }
}
