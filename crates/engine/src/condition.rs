//! Condition evaluation: tests one field predicate against a ticket.

use crate::models::{Condition, ConditionType, Operator, Ticket};

/// Evaluate a single condition.
///
/// `tag` conditions only distinguish `equals` (tag present) from every other
/// operator (tag absent). Unknown condition types and unknown operators
/// evaluate to `false`.
pub fn evaluate(ticket: &Ticket, condition: &Condition) -> bool {
    let field: &str = match &condition.kind {
        ConditionType::Priority => ticket.priority.as_str(),
        ConditionType::Category => ticket.category.as_str(),
        ConditionType::Status => ticket.status.as_str(),
        ConditionType::Assignee => ticket.assignee.as_deref().unwrap_or(""),
        ConditionType::Tag => {
            let present = ticket.tags.contains(&condition.value);
            return match condition.operator {
                Operator::Equals => present,
                _ => !present,
            };
        }
        ConditionType::Other(_) => return false,
    };

    match &condition.operator {
        Operator::Equals => field == condition.value,
        Operator::NotEquals => field != condition.value,
        Operator::Contains => field.contains(condition.value.as_str()),
        Operator::Other(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};

    fn ticket() -> Ticket {
        let mut t = Ticket::new("ticket_1", "Printer on fire", "User");
        t.priority = Priority::High;
        t.category = Category::Problem;
        t.tags.insert("x".into());
        t
    }

    fn cond(kind: ConditionType, operator: Operator, value: &str) -> Condition {
        Condition::new(kind, operator, value)
    }

    #[test]
    fn scalar_fields_support_all_three_operators() {
        let t = ticket();
        assert!(evaluate(&t, &cond(ConditionType::Priority, Operator::Equals, "high")));
        assert!(!evaluate(&t, &cond(ConditionType::Priority, Operator::Equals, "low")));
        assert!(evaluate(&t, &cond(ConditionType::Category, Operator::NotEquals, "incident")));
        assert!(evaluate(&t, &cond(ConditionType::Status, Operator::Contains, "pe")));
        assert!(!evaluate(&t, &cond(ConditionType::Status, Operator::Contains, "closed")));
    }

    #[test]
    fn unset_assignee_reads_as_empty_string() {
        let mut t = ticket();
        assert!(evaluate(&t, &cond(ConditionType::Assignee, Operator::Equals, "")));
        assert!(evaluate(&t, &cond(ConditionType::Assignee, Operator::Contains, "")));

        t.assignee = Some("Senior Support Team".into());
        assert!(evaluate(&t, &cond(ConditionType::Assignee, Operator::Contains, "Senior")));
        assert!(evaluate(&t, &cond(ConditionType::Assignee, Operator::NotEquals, "")));
    }

    #[test]
    fn tag_equals_tests_membership_and_everything_else_tests_absence() {
        let t = ticket();
        assert!(evaluate(&t, &cond(ConditionType::Tag, Operator::Equals, "x")));
        assert!(!evaluate(&t, &cond(ConditionType::Tag, Operator::NotEquals, "x")));
        assert!(!evaluate(&t, &cond(ConditionType::Tag, Operator::Contains, "x")));

        assert!(!evaluate(&t, &cond(ConditionType::Tag, Operator::Equals, "y")));
        assert!(evaluate(&t, &cond(ConditionType::Tag, Operator::NotEquals, "y")));
        assert!(evaluate(&t, &cond(ConditionType::Tag, Operator::Contains, "y")));
        assert!(evaluate(&t, &cond(ConditionType::Tag, Operator::Other("weird".into()), "y")));
    }

    #[test]
    fn unknown_type_is_always_false() {
        let t = ticket();
        for op in [Operator::Equals, Operator::NotEquals, Operator::Contains] {
            assert!(!evaluate(&t, &cond(ConditionType::Other("severity".into()), op, "")));
        }
    }

    #[test]
    fn unknown_operator_is_false_for_scalar_fields() {
        let t = ticket();
        let op = Operator::Other("starts_with".into());
        assert!(!evaluate(&t, &cond(ConditionType::Priority, op, "high")));
    }
}
