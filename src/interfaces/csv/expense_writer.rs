use crate::domain::expense::{Expense, ExpenseStatus};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ExpenseRow<'a> {
    id: u32,
    employee: u32,
    category: &'a str,
    amount: Decimal,
    status: ExpenseStatus,
    reviewer: Option<u32>,
    order: Option<&'a str>,
    payment: Option<&'a str>,
}

impl<'a> From<&'a Expense> for ExpenseRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            id: expense.id,
            employee: expense.employee,
            category: expense.category.as_str(),
            amount: expense.amount.value(),
            status: expense.status,
            reviewer: expense.reviewer,
            order: expense.order_id(),
            payment: expense
                .payment
                .as_ref()
                .and_then(|p| p.payment_id.as_deref()),
        }
    }
}

/// Writes the final state of each claim as CSV:
/// `id,employee,category,amount,status,reviewer,order,payment`.
pub struct ExpenseWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ExpenseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_expenses(&mut self, expenses: &[Expense]) -> Result<()> {
        for expense in expenses {
            self.writer.serialize(ExpenseRow::from(expense))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
