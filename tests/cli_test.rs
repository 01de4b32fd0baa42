use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/workflow.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,employee,category,amount,status,reviewer,order,payment",
        ))
        // Within the travel limit, approved
        .stdout(predicate::str::contains("1,100,travel,450,approved,10,,"))
        // Over the meals limit, rejected at submission
        .stdout(predicate::str::contains("2,100,meals,75.25,rejected,,,"))
        // Rejected by the manager
        .stdout(predicate::str::contains("3,101,travel,120.5,rejected,10,,"))
        // No policy for supplies, approved and awaiting payment
        .stdout(predicate::str::contains(
            "4,101,supplies,19.99,approved,10,order_expense-4,",
        ));

    Ok(())
}

#[test]
fn test_cli_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("expense-engine"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}

#[test]
fn test_cli_rejects_bad_currency() {
    let mut cmd = Command::new(cargo_bin!("expense-engine"));
    cmd.arg("tests/fixtures/workflow.csv")
        .arg("--currency")
        .arg("rupees");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("rupees"));
}
