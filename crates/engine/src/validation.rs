//! Rule validation: run this before persisting or loading rules.
//!
//! Checks enforced:
//! 1. Every condition type and operator is one the evaluator understands.
//! 2. Every action type is one the executor understands.
//! 3. `change_status` / `change_priority` payloads parse into their enums.
//!
//! Only type-correctness is checked. Overlapping or contradictory rules are
//! accepted as-is.

use crate::models::{ActionType, ConditionType, Operator, Priority, Status, WorkflowRule};
use crate::EngineError;

/// Validate every rule, stopping at the first problem.
pub fn validate_rules(rules: &[WorkflowRule]) -> Result<(), EngineError> {
    rules.iter().try_for_each(validate_rule)
}

/// Validate a single rule.
///
/// # Errors
/// - [`EngineError::UnknownConditionType`] / [`EngineError::UnknownOperator`]
///   for conditions that would always evaluate to `false`.
/// - [`EngineError::UnknownActionType`] for actions the executor would skip.
/// - [`EngineError::InvalidActionValue`] for malformed status/priority payloads.
pub fn validate_rule(rule: &WorkflowRule) -> Result<(), EngineError> {
    for condition in &rule.conditions {
        if let ConditionType::Other(kind) = &condition.kind {
            return Err(EngineError::UnknownConditionType {
                rule_id: rule.id.clone(),
                kind: kind.clone(),
            });
        }
        if let Operator::Other(operator) = &condition.operator {
            return Err(EngineError::UnknownOperator {
                rule_id: rule.id.clone(),
                operator: operator.clone(),
            });
        }
    }

    for action in &rule.actions {
        let expected = match &action.kind {
            ActionType::ChangeStatus if action.value.parse::<Status>().is_err() => "status",
            ActionType::ChangePriority if action.value.parse::<Priority>().is_err() => "priority",
            ActionType::Other(kind) => {
                return Err(EngineError::UnknownActionType {
                    rule_id: rule.id.clone(),
                    kind: kind.clone(),
                });
            }
            _ => continue,
        };

        return Err(EngineError::InvalidActionValue {
            rule_id: rule.id.clone(),
            action: action.kind.to_string(),
            value: action.value.clone(),
            expected,
        });
    }

    Ok(())
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Condition, Trigger};
    use crate::samples::sample_rules;
    use chrono::Utc;

    fn rule_with(conditions: Vec<Condition>, actions: Vec<Action>) -> WorkflowRule {
        let mut rule = WorkflowRule::new("test", Trigger::TicketUpdated, conditions, actions);
        rule.id = "rule_test".into();
        rule
    }

    #[test]
    fn sample_rules_are_valid() {
        assert_eq!(validate_rules(&sample_rules(Utc::now())), Ok(()));
    }

    #[test]
    fn unknown_condition_type_is_rejected() {
        let rule = rule_with(
            vec![Condition::equals(ConditionType::Other("severity".into()), "1")],
            vec![],
        );
        assert!(matches!(
            validate_rule(&rule),
            Err(EngineError::UnknownConditionType { kind, .. }) if kind == "severity"
        ));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let rule = rule_with(
            vec![Condition::new(ConditionType::Status, Operator::Other("regex".into()), ".*")],
            vec![],
        );
        assert!(matches!(validate_rule(&rule), Err(EngineError::UnknownOperator { .. })));
    }

    #[test]
    fn tag_with_odd_operator_is_still_type_correct() {
        let rule = rule_with(
            vec![Condition::new(ConditionType::Tag, Operator::Contains, "vip")],
            vec![],
        );
        assert_eq!(validate_rule(&rule), Ok(()));
    }

    #[test]
    fn malformed_status_payload_is_rejected() {
        let rule = rule_with(vec![], vec![Action::new(ActionType::ChangeStatus, "pending")]);
        assert_eq!(
            validate_rule(&rule),
            Err(EngineError::InvalidActionValue {
                rule_id: "rule_test".into(),
                action: "change_status".into(),
                value: "pending".into(),
                expected: "status",
            })
        );
    }

    #[test]
    fn malformed_priority_payload_is_rejected() {
        let rule = rule_with(vec![], vec![Action::new(ActionType::ChangePriority, "P1")]);
        assert!(matches!(
            validate_rule(&rule),
            Err(EngineError::InvalidActionValue { expected: "priority", .. })
        ));
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let rule = rule_with(vec![], vec![Action::new(ActionType::Other("page".into()), "oncall")]);
        assert!(matches!(validate_rule(&rule), Err(EngineError::UnknownActionType { .. })));
    }

    #[test]
    fn free_text_payloads_are_not_checked() {
        let rule = rule_with(
            vec![],
            vec![
                Action::new(ActionType::Assign, ""),
                Action::new(ActionType::AddTag, "anything goes"),
                Action::new(ActionType::Escalate, "ignored"),
            ],
        );
        assert_eq!(validate_rule(&rule), Ok(()));
    }
}
