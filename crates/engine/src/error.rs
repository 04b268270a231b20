//! Engine-level error types.

use thiserror::Error;

/// Errors produced when a rule is authored or loaded.
///
/// Dispatch itself never fails; these are raised at the boundary where rules
/// enter the system so misconfiguration is caught before it reaches a ticket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A condition inspects a field the evaluator does not know.
    #[error("rule '{rule_id}': unknown condition type '{kind}'")]
    UnknownConditionType { rule_id: String, kind: String },

    /// A condition uses an operator the evaluator does not know.
    #[error("rule '{rule_id}': unknown condition operator '{operator}'")]
    UnknownOperator { rule_id: String, operator: String },

    /// An action type the executor does not know.
    #[error("rule '{rule_id}': unknown action type '{kind}'")]
    UnknownActionType { rule_id: String, kind: String },

    /// An enum-valued action payload that does not parse.
    #[error("rule '{rule_id}': {action} value '{value}' is not a valid {expected}")]
    InvalidActionValue {
        rule_id: String,
        action: String,
        value: String,
        expected: &'static str,
    },
}
