//! `engine` crate: ticket rule engine: condition evaluation, rule matching,
//! action execution and dispatch.
//!
//! Everything here is synchronous and free of I/O. Persistence and
//! notification delivery belong to the caller.

pub mod models;
pub mod error;
pub mod condition;
pub mod matcher;
pub mod action;
pub mod dispatcher;
pub mod triggers;
pub mod validation;
pub mod samples;

pub use models::{
    Action, ActionType, Category, Condition, ConditionType, Operator, Priority, Status, Ticket,
    Trigger, WorkflowExecution, WorkflowRule,
};
pub use error::EngineError;
pub use condition::evaluate;
pub use matcher::matches;
pub use action::{apply, ActionEffect, ActionOutcome, UnsupportedAction};
pub use dispatcher::{
    dispatch, reconcile_execution_counts, DispatchConfig, DispatchOutcome, RuleEngine,
    UnsupportedActionPolicy,
};
pub use triggers::detect_triggers;
pub use validation::{validate_rule, validate_rules};
pub use samples::sample_rules;
