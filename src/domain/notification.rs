use super::expense::Expense;
use super::money::Amount;
use serde::{Deserialize, Serialize};

/// Status changes that produce an email.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseEvent {
    /// A claim is waiting for its manager's decision.
    Submitted,
    PolicyRejected { limit: Amount },
    Approved,
    Rejected { reason: String },
    Paid { payment_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn render(event: &ExpenseEvent, expense: &Expense, to: &str) -> Self {
        let claim = format!(
            "expense #{} ({}, {})",
            expense.id, expense.category, expense.amount
        );
        let (subject, body) = match event {
            ExpenseEvent::Submitted => (
                format!("Expense #{} awaits your approval", expense.id),
                format!(
                    "Employee {} submitted {claim}: {}",
                    expense.employee, expense.description
                ),
            ),
            ExpenseEvent::PolicyRejected { limit } => (
                format!("Expense #{} rejected by policy", expense.id),
                format!(
                    "Your {claim} exceeds the {} limit of {limit} and was rejected.",
                    expense.category
                ),
            ),
            ExpenseEvent::Approved => (
                format!("Expense #{} approved", expense.id),
                format!("Your {claim} was approved and is queued for payment."),
            ),
            ExpenseEvent::Rejected { reason } => (
                format!("Expense #{} rejected", expense.id),
                format!("Your {claim} was rejected: {reason}"),
            ),
            ExpenseEvent::Paid { payment_id } => (
                format!("Expense #{} paid", expense.id),
                format!("Your {claim} was paid. Payment reference: {payment_id}"),
            ),
        };
        Self {
            to: to.to_string(),
            subject,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::ExpenseSubmission;
    use crate::domain::policy::Category;
    use rust_decimal_macros::dec;

    fn expense() -> Expense {
        Expense::new(
            3,
            ExpenseSubmission {
                id: 12,
                category: Category::new("Travel").unwrap(),
                amount: Amount::new(dec!(800)).unwrap(),
                description: "Flight to Pune".to_string(),
            },
        )
    }

    #[test]
    fn test_submitted_goes_to_manager_wording() {
        let n = Notification::render(&ExpenseEvent::Submitted, &expense(), "boss@example.com");
        assert_eq!(n.to, "boss@example.com");
        assert_eq!(n.subject, "Expense #12 awaits your approval");
        assert!(n.body.contains("Employee 3"));
        assert!(n.body.contains("Flight to Pune"));
    }

    #[test]
    fn test_policy_rejection_names_limit() {
        let event = ExpenseEvent::PolicyRejected {
            limit: Amount::new(dec!(500)).unwrap(),
        };
        let n = Notification::render(&event, &expense(), "emp@example.com");
        assert!(n.body.contains("travel limit of 500"));
    }

    #[test]
    fn test_paid_includes_reference() {
        let event = ExpenseEvent::Paid {
            payment_id: "pay_9".to_string(),
        };
        let n = Notification::render(&event, &expense(), "emp@example.com");
        assert_eq!(n.subject, "Expense #12 paid");
        assert!(n.body.ends_with("pay_9"));
    }
}
