//! Rule dispatch.
//!
//! [`dispatch`] is the central orchestrator:
//! 1. Selects every rule whose trigger equals the requested one and whose
//!    conditions hold against the ticket as it was when dispatch began.
//! 2. Runs the selected rules in the order they were supplied, folding each
//!    action's output ticket into the next action's input.
//! 3. Produces one `WorkflowExecution` per fired rule and collects any
//!    notifications for the caller to deliver.
//!
//! Dispatch is synchronous and holds no locks. Two dispatches racing on the
//! same ticket identity will each fold from the same snapshot and one set of
//! mutations is lost at the caller's persistence boundary, so callers must
//! serialise dispatch per ticket.

use notify::Notification;
use tracing::{debug, info, instrument, warn};

use crate::action::{apply, ActionEffect};
use crate::matcher::matches;
use crate::models::{Ticket, Trigger, WorkflowExecution, WorkflowRule};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What an unsupported action does to its rule's execution record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedActionPolicy {
    /// Log and carry on; the execution stays `success = true`.
    #[default]
    Ignore,
    /// Carry on, but record the rule's execution as `success = false`.
    MarkFailed,
}

/// Tuning knobs for the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    pub unsupported_actions: UnsupportedActionPolicy,
}

// ---------------------------------------------------------------------------
// Output of a dispatch
// ---------------------------------------------------------------------------

/// The result of dispatching one (ticket, trigger) pair.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The ticket after every fired rule's actions.
    pub ticket: Ticket,
    /// One record per fired rule, in processing order.
    pub executions: Vec<WorkflowExecution>,
    /// Messages from `send_notification` actions, in the order they ran.
    pub notifications: Vec<Notification>,
}

impl DispatchOutcome {
    fn unchanged(ticket: &Ticket) -> Self {
        Self {
            ticket: ticket.clone(),
            executions: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// dispatch
// ---------------------------------------------------------------------------

/// Run every matching rule for `trigger` against `ticket`.
///
/// When nothing matches the original ticket comes back untouched, including
/// its `updated_at`.
#[instrument(skip_all, fields(ticket_id = %ticket.id, trigger = %trigger))]
pub fn dispatch(
    rules: &[WorkflowRule],
    ticket: &Ticket,
    trigger: Trigger,
    config: &DispatchConfig,
) -> DispatchOutcome {
    let selected: Vec<&WorkflowRule> = rules
        .iter()
        .filter(|rule| rule.trigger == trigger && matches(ticket, rule))
        .collect();

    if selected.is_empty() {
        debug!("no rules matched");
        return DispatchOutcome::unchanged(ticket);
    }

    info!("{} rule(s) selected", selected.len());

    let mut current = ticket.clone();
    let mut executions = Vec::with_capacity(selected.len());
    let mut notifications = Vec::new();

    for rule in selected {
        let mut actions_executed = Vec::with_capacity(rule.actions.len());
        let mut success = true;

        for action in &rule.actions {
            let outcome = apply(&current, action);
            current = outcome.ticket;
            actions_executed.push(action.log_entry());

            match outcome.effect {
                ActionEffect::Applied => {}
                ActionEffect::Notified(message) => {
                    debug!(rule_id = %rule.id, "notification queued: {message}");
                    notifications.push(Notification::new(&rule.id, &ticket.id, message));
                }
                ActionEffect::Unsupported(reason) => {
                    warn!(rule_id = %rule.id, action_id = %action.id, "action skipped: {reason}");
                    if config.unsupported_actions == UnsupportedActionPolicy::MarkFailed {
                        success = false;
                    }
                }
            }
        }

        info!(rule_id = %rule.id, "rule '{}' fired ({} action(s))", rule.name, actions_executed.len());
        executions.push(WorkflowExecution::record(
            &rule.id,
            &ticket.id,
            success,
            actions_executed,
        ));
    }

    DispatchOutcome {
        ticket: current,
        executions,
        notifications,
    }
}

// ---------------------------------------------------------------------------
// Execution-count reconciliation
// ---------------------------------------------------------------------------

/// Post-dispatch bookkeeping: bump `execution_count` on every rule that has a
/// successful execution in `executions`.
///
/// Returns the number of increments made. Executions naming a rule that is
/// not in `rules` are skipped.
pub fn reconcile_execution_counts(
    rules: &mut [WorkflowRule],
    executions: &[WorkflowExecution],
) -> usize {
    let mut bumped = 0;
    for execution in executions.iter().filter(|e| e.success) {
        if let Some(rule) = rules.iter_mut().find(|r| r.id == execution.rule_id) {
            rule.execution_count += 1;
            bumped += 1;
        }
    }
    bumped
}

// ---------------------------------------------------------------------------
// RuleEngine
// ---------------------------------------------------------------------------

/// A rule set plus an in-memory, append-only log of what it has done.
///
/// The log mirrors what callers already receive from
/// [`RuleEngine::process_ticket`]; it is not the system of record. The
/// engine never touches `execution_count` on its own copy of the rules.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<WorkflowRule>,
    config: DispatchConfig,
    executions: Vec<WorkflowExecution>,
}

impl RuleEngine {
    pub fn new(rules: Vec<WorkflowRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the working rule set wholesale.
    pub fn set_rules(&mut self, rules: Vec<WorkflowRule>) {
        self.rules = rules;
    }

    pub fn rules(&self) -> &[WorkflowRule] {
        &self.rules
    }

    /// Dispatch against the current rule set and append the new executions
    /// to the log.
    pub fn process_ticket(&mut self, ticket: &Ticket, trigger: Trigger) -> DispatchOutcome {
        let outcome = dispatch(&self.rules, ticket, trigger, &self.config);
        self.executions.extend(outcome.executions.iter().cloned());
        outcome
    }

    pub fn executions(&self) -> &[WorkflowExecution] {
        &self.executions
    }

    pub fn executions_for_ticket(&self, ticket_id: &str) -> Vec<&WorkflowExecution> {
        self.executions
            .iter()
            .filter(|e| e.ticket_id == ticket_id)
            .collect()
    }
}
