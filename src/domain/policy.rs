use super::money::Amount;
use crate::error::{ExpenseError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized expense category (trimmed and lowercased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ExpenseError::ValidationError(
                "Category must not be empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Category {
    type Error = ExpenseError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A spending limit for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub category: Category,
    pub limit: Amount,
}

impl Policy {
    pub fn new(category: Category, limit: Amount) -> Self {
        Self { category, limit }
    }
}

/// Outcome of checking a claim against its category's policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyDecision {
    /// No policy is configured for the category.
    Unrestricted,
    WithinLimit { limit: Amount },
    ExceedsLimit { limit: Amount, excess: Decimal },
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, PolicyDecision::ExceedsLimit { .. })
    }
}

/// Checks `amount` against `policy`. An amount equal to the limit is allowed.
pub fn evaluate(policy: Option<&Policy>, amount: Amount) -> PolicyDecision {
    match policy {
        None => PolicyDecision::Unrestricted,
        Some(policy) if amount <= policy.limit => PolicyDecision::WithinLimit {
            limit: policy.limit,
        },
        Some(policy) => PolicyDecision::ExceedsLimit {
            limit: policy.limit,
            excess: amount.value() - policy.limit.value(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    fn travel_policy(limit: Decimal) -> Policy {
        Policy::new(Category::new("travel").unwrap(), amount(limit))
    }

    #[test]
    fn test_category_normalization() {
        let category = Category::new("  Travel ").unwrap();
        assert_eq!(category.as_str(), "travel");
        assert!(matches!(
            Category::new("   "),
            Err(ExpenseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_no_policy_is_unrestricted() {
        let decision = evaluate(None, amount(dec!(1000000)));
        assert_eq!(decision, PolicyDecision::Unrestricted);
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_within_limit() {
        let policy = travel_policy(dec!(500));
        let decision = evaluate(Some(&policy), amount(dec!(499.99)));
        assert_eq!(
            decision,
            PolicyDecision::WithinLimit {
                limit: amount(dec!(500))
            }
        );
    }

    #[test]
    fn test_limit_is_inclusive() {
        let policy = travel_policy(dec!(500));
        assert!(evaluate(Some(&policy), amount(dec!(500.00))).is_allowed());
    }

    #[test]
    fn test_exceeds_limit_reports_excess() {
        let policy = travel_policy(dec!(500));
        let decision = evaluate(Some(&policy), amount(dec!(650.25)));
        assert_eq!(
            decision,
            PolicyDecision::ExceedsLimit {
                limit: amount(dec!(500)),
                excess: dec!(150.25),
            }
        );
        assert!(!decision.is_allowed());
    }
}
