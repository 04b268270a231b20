//! The caller side of the rule engine.
//!
//! `Automator` owns everything the engine deliberately does not: loading the
//! rule set, persisting the resulting ticket, appending executions to the
//! log, reconciling `execution_count`, and delivering notifications.
//!
//! Processing is not locked per ticket. The CLI handles one ticket per
//! process; anything embedding `Automator` concurrently must serialise calls
//! for the same ticket id.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{info, instrument, warn};

use db::repository::{executions, rules, tickets};
use db::{DataStore, DbError};
use engine::{
    detect_triggers, dispatch, sample_rules, validate_rule, DispatchConfig, Status, Ticket,
    Trigger, WorkflowExecution, WorkflowRule,
};
use notify::{Notification, Notifier};

/// What happened to one submitted or updated ticket.
#[derive(Debug)]
pub struct ProcessReport {
    /// The ticket as persisted.
    pub ticket: Ticket,
    /// Triggers dispatched, in order.
    pub triggers: Vec<Trigger>,
    pub executions: Vec<WorkflowExecution>,
    pub notifications_delivered: usize,
    pub notifications_failed: usize,
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub active_rules: usize,
    pub total_executions: usize,
}

pub struct Automator {
    store: DataStore,
    config: DispatchConfig,
    notifier: Arc<dyn Notifier>,
}

impl Automator {
    pub fn new(store: DataStore, config: DispatchConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, config, notifier }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Install the sample rules when the store holds neither tickets nor rules.
    ///
    /// Returns `true` if anything was written.
    pub fn seed_samples(&self) -> Result<bool> {
        if !tickets::list(&self.store)?.is_empty() || !rules::list(&self.store)?.is_empty() {
            return Ok(false);
        }
        rules::replace_all(&self.store, &sample_rules(Utc::now()))?;
        info!("Seeded sample rules");
        Ok(true)
    }

    /// Run `ticket_created` rules for a new ticket and store the result.
    #[instrument(skip_all, fields(ticket_id = %ticket.id))]
    pub async fn submit(&self, ticket: Ticket) -> Result<ProcessReport> {
        match tickets::get(&self.store, &ticket.id) {
            Ok(_) => bail!("ticket '{}' already exists; use `update` instead", ticket.id),
            Err(DbError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let rule_set = self.load_rule_set()?;
        let outcome = dispatch(&rule_set, &ticket, Trigger::TicketCreated, &self.config);

        tickets::create(&self.store, &outcome.ticket)?;
        self.finish(
            outcome.ticket,
            vec![Trigger::TicketCreated],
            outcome.executions,
            outcome.notifications,
        )
        .await
    }

    /// Run the triggers raised by an edit, in order, and store the result.
    ///
    /// Each trigger's dispatch starts from the ticket the previous one
    /// produced.
    #[instrument(skip_all, fields(ticket_id = %ticket.id))]
    pub async fn update(&self, ticket: Ticket) -> Result<ProcessReport> {
        let previous = tickets::get(&self.store, &ticket.id)
            .with_context(|| format!("cannot update ticket '{}'", ticket.id))?;
        let triggers = detect_triggers(&previous, &ticket);
        let rule_set = self.load_rule_set()?;

        let mut current = ticket;
        let mut new_executions = Vec::new();
        let mut notifications = Vec::new();

        for &trigger in &triggers {
            let outcome = dispatch(&rule_set, &current, trigger, &self.config);
            current = outcome.ticket;
            new_executions.extend(outcome.executions);
            notifications.extend(outcome.notifications);
        }

        tickets::update(&self.store, &current)?;
        self.finish(current, triggers, new_executions, notifications).await
    }

    /// Load the rule set and make sure the execution log parses.
    ///
    /// Called before the first write of a submit or update, so a collection
    /// that fails to load leaves the store untouched.
    fn load_rule_set(&self) -> Result<Vec<WorkflowRule>> {
        executions::list(&self.store).context("cannot read the execution log")?;
        Ok(rules::list(&self.store)?)
    }

    async fn finish(
        &self,
        ticket: Ticket,
        triggers: Vec<Trigger>,
        new_executions: Vec<WorkflowExecution>,
        notifications: Vec<Notification>,
    ) -> Result<ProcessReport> {
        executions::append(&self.store, &new_executions)?;
        rules::apply_execution_counts(&self.store, &new_executions)?;

        let (delivered, failed) = self.deliver(&notifications).await;

        info!(
            "{} execution(s) recorded, {} notification(s) delivered",
            new_executions.len(),
            delivered
        );

        Ok(ProcessReport {
            ticket,
            triggers,
            executions: new_executions,
            notifications_delivered: delivered,
            notifications_failed: failed,
        })
    }

    /// Delivery failures are logged and counted; the ticket is already saved.
    async fn deliver(&self, notifications: &[Notification]) -> (usize, usize) {
        let mut delivered = 0;
        let mut failed = 0;

        for notification in notifications {
            match self.notifier.deliver(notification).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(rule_id = %notification.rule_id, "notification not delivered: {e}");
                    failed += 1;
                }
            }
        }

        (delivered, failed)
    }

    /// Validate a rule and register it after the existing ones.
    pub fn add_rule(&self, rule: &WorkflowRule) -> Result<()> {
        validate_rule(rule)?;
        rules::create(&self.store, rule)?;
        info!(rule_id = %rule.id, "Added rule '{}'", rule.name);
        Ok(())
    }

    /// Enable or disable a rule in place. Returns the stored rule.
    pub fn set_rule_enabled(&self, id: &str, enabled: bool) -> Result<WorkflowRule> {
        let mut rule = rules::get(&self.store, id)?;
        if rule.enabled != enabled {
            rule.enabled = enabled;
            rules::update(&self.store, &rule)?;
            info!(rule_id = %id, "Rule {}", if enabled { "enabled" } else { "disabled" });
        }
        Ok(rule)
    }

    /// Delete a rule. Its past executions stay in the log.
    pub fn delete_rule(&self, id: &str) -> Result<()> {
        rules::delete(&self.store, id)?;
        info!(rule_id = %id, "Deleted rule");
        Ok(())
    }

    pub fn stats(&self) -> Result<Stats> {
        let all_tickets = tickets::list(&self.store)?;
        Ok(Stats {
            total_tickets: all_tickets.len(),
            open_tickets: all_tickets.iter().filter(|t| t.status == Status::Open).count(),
            active_rules: rules::list(&self.store)?.iter().filter(|r| r.enabled).count(),
            total_executions: executions::list(&self.store)?.len(),
        })
    }
}
