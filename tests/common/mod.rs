#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "command, actor, subject, category, amount, detail";
pub const SECRET: &str = "sandbox-secret";

/// Admin 1, manager 10 and employee 100 reporting to manager 10.
pub const ORG: &[&str] = &[
    "admin, 1, , , , admin@example.com",
    "manager, 1, 10, , , boss@example.com",
    "employee, 100, 10, , , emp@example.com",
];

pub fn command_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in ORG.iter().chain(rows) {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// `verify` row for a sandbox order, signed with the default sandbox secret.
pub fn verify_row(expense: u32, payment_id: &str) -> String {
    let order_id = format!("order_expense-{expense}");
    let signature =
        expense_engine::infrastructure::gateway::sign_payment(SECRET, &order_id, payment_id)
            .unwrap();
    format!("verify, 0, {expense}, , , {order_id}:{payment_id}:{signature}")
}
