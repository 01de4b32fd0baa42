use crate::error::{ExpenseError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of fractional digits an amount may carry.
const MAX_SCALE: u32 = 2;

/// Represents a positive monetary amount for expenses and policy limits.
///
/// This is a wrapper around `rust_decimal::Decimal` that enforces the two
/// invariants every claim amount shares: it is strictly positive and it is
/// expressible in the currency's minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(ExpenseError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }
        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(ExpenseError::ValidationError(format!(
                "Amount {value} has more than {MAX_SCALE} decimal places"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Amount in the currency's minor unit (paise, cents).
    pub fn to_minor_units(&self) -> Result<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .ok_or_else(|| ExpenseError::ValidationError(format!("Amount {} is too large", self.0)))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ExpenseError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
