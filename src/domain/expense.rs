use super::money::Amount;
use super::payment::{PaymentOrder, PaymentRecord, PaymentStatus};
use super::policy::Category;
use crate::error::{ExpenseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl ExpenseStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExpenseStatus::Rejected | ExpenseStatus::Paid)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
            ExpenseStatus::Paid => "paid",
        };
        f.write_str(name)
    }
}

/// A claim as submitted by an employee, before policy evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSubmission {
    pub id: u32,
    pub category: Category,
    pub amount: Amount,
    pub description: String,
}

/// Represents the state of a single expense claim.
///
/// All status changes go through the transition methods below, which refuse
/// anything outside `pending -> approved | rejected` and `approved -> paid`
/// and leave the expense untouched when they do.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Expense {
    pub id: u32,
    /// Submitting employee.
    pub employee: u32,
    pub category: Category,
    pub amount: Amount,
    pub description: String,
    pub status: ExpenseStatus,
    /// Manager who approved or rejected the claim. `None` for policy rejections.
    pub reviewer: Option<u32>,
    pub rejection_reason: Option<String>,
    pub payment: Option<PaymentRecord>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(employee: u32, submission: ExpenseSubmission) -> Self {
        let now = Utc::now();
        Self {
            id: submission.id,
            employee,
            category: submission.category,
            amount: submission.amount,
            description: submission.description,
            status: ExpenseStatus::Pending,
            reviewer: None,
            rejection_reason: None,
            payment: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    fn ensure(&self, expected: ExpenseStatus, action: &'static str) -> Result<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(ExpenseError::InvalidTransition {
                id: self.id,
                from: self.status,
                action,
            })
        }
    }

    fn touch(&mut self, status: ExpenseStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn approve(&mut self, reviewer: u32) -> Result<()> {
        self.ensure(ExpenseStatus::Pending, "approve")?;
        self.reviewer = Some(reviewer);
        self.touch(ExpenseStatus::Approved);
        Ok(())
    }

    /// Rejects a pending claim. `reviewer` is `None` when the policy evaluator
    /// rejects the claim at submission.
    pub fn reject(&mut self, reviewer: Option<u32>, reason: &str) -> Result<()> {
        self.ensure(ExpenseStatus::Pending, "reject")?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ExpenseError::ValidationError(
                "Rejection reason must not be empty".to_string(),
            ));
        }
        self.reviewer = reviewer;
        self.rejection_reason = Some(reason.to_string());
        self.touch(ExpenseStatus::Rejected);
        Ok(())
    }

    pub fn attach_order(&mut self, order: PaymentOrder) -> Result<()> {
        self.ensure(ExpenseStatus::Approved, "pay")?;
        self.payment = Some(PaymentRecord::created(order));
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_paid(&mut self, payment_id: &str) -> Result<()> {
        self.ensure(ExpenseStatus::Approved, "settle")?;
        let Some(payment) = self.payment.as_mut() else {
            return Err(ExpenseError::ValidationError(format!(
                "Expense {} has no payment order",
                self.id
            )));
        };
        payment.status = PaymentStatus::Captured;
        payment.payment_id = Some(payment_id.to_string());
        self.touch(ExpenseStatus::Paid);
        Ok(())
    }

    pub fn order_id(&self) -> Option<&str> {
        self.payment.as_ref().map(|p| p.order.order_id.as_str())
    }
}
