//! Execution log repository functions.
//!
//! The log is append-only: records are never edited or removed.

use engine::WorkflowExecution;

use crate::{Collection, DataStore, DbError};

/// Return the whole log, oldest first.
pub fn list(store: &DataStore) -> Result<Vec<WorkflowExecution>, DbError> {
    store.load(Collection::Executions)
}

/// Return the log entries for one ticket, oldest first.
pub fn list_for_ticket(store: &DataStore, ticket_id: &str) -> Result<Vec<WorkflowExecution>, DbError> {
    let mut executions = list(store)?;
    executions.retain(|e| e.ticket_id == ticket_id);
    Ok(executions)
}

/// Append new records to the end of the log.
pub fn append(store: &DataStore, new: &[WorkflowExecution]) -> Result<(), DbError> {
    if new.is_empty() {
        return Ok(());
    }
    let mut executions = list(store)?;
    executions.extend_from_slice(new);
    store.save(Collection::Executions, &executions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_preserves_order_and_filters_by_ticket() {
        let temp = TempDir::new().unwrap();
        let store = DataStore::open(temp.path()).unwrap();

        let first = WorkflowExecution::record("rule_a", "ticket_1", true, vec!["assign: x".into()]);
        let second = WorkflowExecution::record("rule_b", "ticket_2", true, vec![]);
        let third = WorkflowExecution::record("rule_b", "ticket_1", true, vec![]);

        append(&store, &[first.clone(), second.clone()]).unwrap();
        append(&store, &[third.clone()]).unwrap();
        append(&store, &[]).unwrap();

        assert_eq!(list(&store).unwrap(), vec![first.clone(), second, third.clone()]);
        assert_eq!(list_for_ticket(&store, "ticket_1").unwrap(), vec![first, third]);
        assert!(list_for_ticket(&store, "nope").unwrap().is_empty());
    }

    #[test]
    fn appends_after_records_with_foreign_id_formats() {
        let temp = TempDir::new().unwrap();
        let store = DataStore::open(temp.path()).unwrap();
        std::fs::write(
            store.path_for(Collection::Executions),
            r#"[{"id":"exec_1700000000000_abc123xyz","ruleId":"rule_1","ticketId":"ticket_1",
                "executedAt":"2023-11-14T22:13:20.000Z","success":true,"actionsExecuted":[]}]"#,
        )
        .unwrap();

        let next = WorkflowExecution::record("rule_1", "ticket_2", true, vec![]);
        append(&store, &[next.clone()]).unwrap();

        let log = list(&store).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].id, "exec_1700000000000_abc123xyz");
        assert_eq!(log[1], next);
    }

    #[test]
    fn stored_records_use_camel_case_and_rfc3339_dates() {
        let temp = TempDir::new().unwrap();
        let store = DataStore::open(temp.path()).unwrap();
        append(&store, &[WorkflowExecution::record("r", "t", true, vec![])]).unwrap();

        let raw = std::fs::read_to_string(store.path_for(Collection::Executions)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &json[0];
        assert_eq!(entry["ruleId"], "r");
        assert_eq!(entry["actionsExecuted"], serde_json::json!([]));
        let executed_at = entry["executedAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(executed_at).is_ok());
    }
}
