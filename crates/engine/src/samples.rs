//! Built-in starter rules, seeded into an empty store on first run.

use chrono::{DateTime, Utc};

use crate::models::{
    Action, ActionType, Condition, ConditionType, Operator, Trigger, WorkflowRule,
};

fn condition(id: &str, kind: ConditionType, value: &str) -> Condition {
    Condition {
        id: id.to_owned(),
        kind,
        operator: Operator::Equals,
        value: value.to_owned(),
    }
}

fn action(id: &str, kind: ActionType, value: &str, description: &str) -> Action {
    Action {
        id: id.to_owned(),
        kind,
        value: value.to_owned(),
        description: description.to_owned(),
    }
}

/// "Auto-assign Critical Incidents" followed by "Change Request Notification".
pub fn sample_rules(now: DateTime<Utc>) -> Vec<WorkflowRule> {
    vec![
        WorkflowRule {
            id: "rule_sample_1".into(),
            name: "Auto-assign Critical Incidents".into(),
            description: "Automatically assign critical incidents to senior support".into(),
            enabled: true,
            trigger: Trigger::TicketCreated,
            conditions: vec![
                condition("cond_1", ConditionType::Priority, "critical"),
                condition("cond_2", ConditionType::Category, "incident"),
            ],
            actions: vec![
                action("action_1", ActionType::Assign, "Senior Support Team", "Assign to senior support"),
                action("action_2", ActionType::AddTag, "escalated", "Add escalated tag"),
            ],
            created_at: now,
            execution_count: 0,
        },
        WorkflowRule {
            id: "rule_sample_2".into(),
            name: "Change Request Notification".into(),
            description: "Notify change advisory board for change requests".into(),
            enabled: true,
            trigger: Trigger::TicketCreated,
            conditions: vec![condition("cond_3", ConditionType::Category, "change")],
            actions: vec![
                action(
                    "action_3",
                    ActionType::SendNotification,
                    "CAB Team - New change request submitted",
                    "Notify CAB",
                ),
                action("action_4", ActionType::ChangeStatus, "in_progress", "Set to in progress"),
            ],
            created_at: now,
            execution_count: 0,
        },
    ]
}
