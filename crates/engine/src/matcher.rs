//! Rule matching: a conjunction of conditions gated by the enabled flag.
//!
//! Trigger filtering is left to the dispatcher so this stays usable on its own.

use crate::condition::evaluate;
use crate::models::{Ticket, WorkflowRule};

/// `true` when the rule is enabled and every condition holds.
///
/// A rule with no conditions matches every ticket.
pub fn matches(ticket: &Ticket, rule: &WorkflowRule) -> bool {
    rule.enabled && rule.conditions.iter().all(|c| evaluate(ticket, c))
}
