//! Workflow rule CRUD operations.

use engine::{reconcile_execution_counts, WorkflowExecution, WorkflowRule};
use tracing::debug;

use crate::{Collection, DataStore, DbError};

const KIND: &str = "rule";

/// Return all rules in registration order (the order dispatch uses).
pub fn list(store: &DataStore) -> Result<Vec<WorkflowRule>, DbError> {
    store.load(Collection::Workflows)
}

/// Fetch a single rule by id.
pub fn get(store: &DataStore, id: &str) -> Result<WorkflowRule, DbError> {
    list(store)?
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| DbError::NotFound { kind: KIND, id: id.to_owned() })
}

/// Register a new rule after every existing one.
pub fn create(store: &DataStore, rule: &WorkflowRule) -> Result<(), DbError> {
    let mut rules = list(store)?;
    if rules.iter().any(|r| r.id == rule.id) {
        return Err(DbError::AlreadyExists { kind: KIND, id: rule.id.clone() });
    }
    rules.push(rule.clone());
    store.save(Collection::Workflows, &rules)
}

/// Replace an existing rule without changing its position.
pub fn update(store: &DataStore, rule: &WorkflowRule) -> Result<(), DbError> {
    let mut rules = list(store)?;
    let slot = rules
        .iter_mut()
        .find(|r| r.id == rule.id)
        .ok_or_else(|| DbError::NotFound { kind: KIND, id: rule.id.clone() })?;
    *slot = rule.clone();
    store.save(Collection::Workflows, &rules)
}

/// Permanently delete a rule by id.
///
/// Returns `DbError::NotFound` if nothing was deleted.
pub fn delete(store: &DataStore, id: &str) -> Result<(), DbError> {
    let mut rules = list(store)?;
    let before = rules.len();
    rules.retain(|r| r.id != id);

    if rules.len() == before {
        return Err(DbError::NotFound { kind: KIND, id: id.to_owned() });
    }

    store.save(Collection::Workflows, &rules)
}

/// Overwrite the whole rule set.
pub fn replace_all(store: &DataStore, rules: &[WorkflowRule]) -> Result<(), DbError> {
    store.save(Collection::Workflows, rules)
}

/// Bump `execution_count` for every rule with a successful execution.
///
/// Returns the number of increments persisted.
pub fn apply_execution_counts(
    store: &DataStore,
    executions: &[WorkflowExecution],
) -> Result<usize, DbError> {
    if executions.is_empty() {
        return Ok(0);
    }

    let mut rules = list(store)?;
    let bumped = reconcile_execution_counts(&mut rules, executions);
    if bumped > 0 {
        store.save(Collection::Workflows, &rules)?;
    }
    debug!("Reconciled execution counts for {bumped} rule(s)");
    Ok(bumped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engine::{sample_rules, Trigger};
    use tempfile::TempDir;

    fn seeded() -> (TempDir, DataStore) {
        let temp = TempDir::new().unwrap();
        let store = DataStore::open(temp.path()).unwrap();
        replace_all(&store, &sample_rules(Utc::now())).unwrap();
        (temp, store)
    }

    #[test]
    fn rules_keep_registration_order() {
        let (_temp, store) = seeded();
        let extra = WorkflowRule::new("Catch-all", Trigger::TicketUpdated, vec![], vec![]);
        create(&store, &extra).unwrap();

        let ids: Vec<_> = list(&store).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["rule_sample_1".to_string(), "rule_sample_2".into(), extra.id]);
    }

    #[test]
    fn update_keeps_position() {
        let (_temp, store) = seeded();
        let mut rule = get(&store, "rule_sample_1").unwrap();
        rule.enabled = false;
        update(&store, &rule).unwrap();

        let rules = list(&store).unwrap();
        assert_eq!(rules[0].id, "rule_sample_1");
        assert!(!rules[0].enabled);
    }

    #[test]
    fn delete_missing_rule_is_not_found() {
        let (_temp, store) = seeded();
        delete(&store, "rule_sample_2").unwrap();
        assert!(matches!(delete(&store, "rule_sample_2"), Err(DbError::NotFound { .. })));
        assert_eq!(list(&store).unwrap().len(), 1);
    }

    #[test]
    fn execution_counts_are_persisted() {
        let (_temp, store) = seeded();
        let executions = vec![
            WorkflowExecution::record("rule_sample_2", "ticket_1", true, vec![]),
            WorkflowExecution::record("rule_sample_2", "ticket_2", true, vec![]),
            WorkflowExecution::record("rule_sample_1", "ticket_3", false, vec![]),
        ];

        assert_eq!(apply_execution_counts(&store, &executions).unwrap(), 2);
        assert_eq!(get(&store, "rule_sample_1").unwrap().execution_count, 0);
        assert_eq!(get(&store, "rule_sample_2").unwrap().execution_count, 2);
    }
}
