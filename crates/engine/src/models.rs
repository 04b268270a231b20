//! Core domain models for the rule engine.
//!
//! These types are the source of truth for what a ticket and a workflow rule
//! look like in memory. They serialise to the same camelCase JSON shape the
//! ticket store keeps on disk.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Ticket enums
// ---------------------------------------------------------------------------

/// What kind of work a ticket represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Incident,
    ServiceRequest,
    Change,
    Problem,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incident       => "incident",
            Self::ServiceRequest => "service_request",
            Self::Change         => "change",
            Self::Problem        => "problem",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incident"        => Ok(Self::Incident),
            "service_request" => Ok(Self::ServiceRequest),
            "change"          => Ok(Self::Change),
            "problem"         => Ok(Self::Problem),
            other             => Err(format!("unknown ticket category: {other}")),
        }
    }
}

/// Ticket urgency. Variants are declared in ascending order so the derived
/// `Ord` matches low < medium < high < critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Medium   => "medium",
            Self::High     => "high",
            Self::Critical => "critical",
        }
    }

    /// One step up the ladder; `Critical` stays `Critical`.
    pub fn escalated(self) -> Self {
        match self {
            Self::Low      => Self::Medium,
            Self::Medium   => Self::High,
            Self::High     => Self::Critical,
            Self::Critical => Self::Critical,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low"      => Ok(Self::Low),
            "medium"   => Ok(Self::Medium),
            "high"     => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other      => Err(format!("unknown ticket priority: {other}")),
        }
    }
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open       => "open",
            Self::InProgress => "in_progress",
            Self::Resolved   => "resolved",
            Self::Closed     => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open"        => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved"    => Ok(Self::Resolved),
            "closed"      => Ok(Self::Closed),
            other         => Err(format!("unknown ticket status: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// A service-desk ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    /// `None` and `Some("")` both read as "unassigned" to conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub requester: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// A fresh, open, unassigned medium-priority incident.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        requester: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: Category::Incident,
            priority: Priority::Medium,
            status: Status::Open,
            assignee: None,
            requester: requester.into(),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    /// Refresh `updated_at`, never letting it fall behind `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Which ticket field a condition inspects.
///
/// Unrecognised spellings survive deserialisation as `Other` so that stored
/// rules keep loading; the evaluator treats them as never matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    Priority,
    Category,
    Status,
    Tag,
    Assignee,
    Other(String),
}

impl ConditionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Priority => "priority",
            Self::Category => "category",
            Self::Status   => "status",
            Self::Tag      => "tag",
            Self::Assignee => "assignee",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ConditionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "priority" => Self::Priority,
            "category" => Self::Category,
            "status"   => Self::Status,
            "tag"      => Self::Tag,
            "assignee" => Self::Assignee,
            _          => Self::Other(s),
        }
    }
}

impl From<ConditionType> for String {
    fn from(t: ConditionType) -> Self {
        match t {
            ConditionType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied between the extracted field and the condition value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals    => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains  => "contains",
            Self::Other(s)  => s,
        }
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "equals"     => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains"   => Self::Contains,
            _            => Self::Other(s),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConditionType,
    pub operator: Operator,
    pub value: String,
}

impl Condition {
    pub fn new(kind: ConditionType, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            id: format!("cond_{}", Uuid::new_v4().simple()),
            kind,
            operator,
            value: value.into(),
        }
    }

    pub fn equals(kind: ConditionType, value: impl Into<String>) -> Self {
        Self::new(kind, Operator::Equals, value)
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The mutation an action performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Assign,
    ChangeStatus,
    ChangePriority,
    AddTag,
    SendNotification,
    Escalate,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Assign           => "assign",
            Self::ChangeStatus     => "change_status",
            Self::ChangePriority   => "change_priority",
            Self::AddTag           => "add_tag",
            Self::SendNotification => "send_notification",
            Self::Escalate         => "escalate",
            Self::Other(s)         => s,
        }
    }
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "assign"            => Self::Assign,
            "change_status"     => Self::ChangeStatus,
            "change_priority"   => Self::ChangePriority,
            "add_tag"           => Self::AddTag,
            "send_notification" => Self::SendNotification,
            "escalate"          => Self::Escalate,
            _                   => Self::Other(s),
        }
    }
}

impl From<ActionType> for String {
    fn from(t: ActionType) -> Self {
        match t {
            ActionType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[serde(default)]
    pub value: String,
    /// Audit text only; never evaluated.
    #[serde(default)]
    pub description: String,
}

impl Action {
    pub fn new(kind: ActionType, value: impl Into<String>) -> Self {
        Self {
            id: format!("action_{}", Uuid::new_v4().simple()),
            kind,
            value: value.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The `"<type>: <value>"` line recorded in `actionsExecuted`.
    pub fn log_entry(&self) -> String {
        format!("{}: {}", self.kind, self.value)
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// The ticket event a rule listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    TicketCreated,
    TicketUpdated,
    StatusChanged,
    PriorityChanged,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TicketCreated   => "ticket_created",
            Self::TicketUpdated   => "ticket_updated",
            Self::StatusChanged   => "status_changed",
            Self::PriorityChanged => "priority_changed",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticket_created"   => Ok(Self::TicketCreated),
            "ticket_updated"   => Ok(Self::TicketUpdated),
            "status_changed"   => Ok(Self::StatusChanged),
            "priority_changed" => Ok(Self::PriorityChanged),
            other              => Err(format!("unknown trigger: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowRule
// ---------------------------------------------------------------------------

/// A declarative automation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    pub trigger: Trigger,
    /// AND-ed together; empty means "always".
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Applied in order, each seeing the previous one's result.
    #[serde(default)]
    pub actions: Vec<Action>,
    pub created_at: DateTime<Utc>,
    /// Maintained by the caller, see [`crate::reconcile_execution_counts`].
    #[serde(default)]
    pub execution_count: u64,
}

impl WorkflowRule {
    /// Convenience constructor: enabled, never executed.
    pub fn new(
        name: impl Into<String>,
        trigger: Trigger,
        conditions: Vec<Condition>,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            id: format!("rule_{}", Uuid::new_v4().simple()),
            name: name.into(),
            description: String::new(),
            enabled: true,
            trigger,
            conditions,
            actions,
            created_at: Utc::now(),
            execution_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowExecution
// ---------------------------------------------------------------------------

/// Immutable audit record: one per rule that fired in a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    /// Opaque. New records use `exec_<uuid>`; older logs may hold other forms.
    pub id: String,
    pub rule_id: String,
    pub ticket_id: String,
    pub executed_at: DateTime<Utc>,
    pub success: bool,
    pub actions_executed: Vec<String>,
}

impl WorkflowExecution {
    pub fn record(
        rule_id: impl Into<String>,
        ticket_id: impl Into<String>,
        success: bool,
        actions_executed: Vec<String>,
    ) -> Self {
        Self {
            id: format!("exec_{}", Uuid::new_v4().simple()),
            rule_id: rule_id.into(),
            ticket_id: ticket_id.into(),
            executed_at: Utc::now(),
            success,
            actions_executed,
        }
    }
}
