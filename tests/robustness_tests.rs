use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_malformed_csv_handling() {
    let file = common::command_file(&[
        // Valid submission
        "submit, 100, 1, meals, 10, Lunch",
        // Unknown command
        "refund, 100, 2, meals, 10,",
        // Missing amount (required)
        "submit, 100, 3, meals, ,",
        // Valid submission again
        "submit, 100, 4, meals, 20, Dinner",
    ]);

    let mut cmd = Command::new(cargo_bin!("expense-engine"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unreadable command"))
        .stdout(predicate::str::contains("1,100,meals,10,pending"))
        .stdout(predicate::str::contains("4,100,meals,20,pending"))
        .stdout(predicate::str::contains("\n3,").not());
}

#[test]
fn test_invalid_data_types() {
    let file = common::command_file(&[
        // Text in amount field
        "submit, 100, 1, meals, not_a_number, Lunch",
        // Non-integer actor
        "submit, abc, 2, meals, 10, Lunch",
        // Negative amount
        "submit, 100, 3, meals, -5, Lunch",
        // Valid submission
        "submit, 100, 4, meals, 5, Coffee",
    ]);

    let mut cmd = Command::new(cargo_bin!("expense-engine"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unreadable command"))
        .stdout(predicate::str::contains("4,100,meals,5,pending"))
        .stdout(predicate::str::contains("\n1,").not());
}

#[test]
fn test_duplicate_submission_keeps_first() {
    let file = common::command_file(&[
        "submit, 100, 1, meals, 10, Lunch",
        "submit, 100, 1, meals, 99, Lunch again",
    ]);

    let mut cmd = Command::new(cargo_bin!("expense-engine"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("command rejected"))
        .stdout(predicate::str::contains("1,100,meals,10,pending"))
        .stdout(predicate::str::contains("99").not());
}

#[test]
fn test_oversized_payment_is_rejected_not_fatal() {
    let file = common::command_file(&[
        "submit, 100, 1, travel, 79228162514264337593543950335, Charter",
        "approve, 10, 1, , ,",
        "pay, 10, 1, , ,",
        "submit, 100, 2, meals, 10, Lunch",
    ]);

    let mut cmd = Command::new(cargo_bin!("expense-engine"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("command rejected"))
        .stdout(predicate::str::contains(
            "1,100,travel,79228162514264337593543950335,approved",
        ))
        .stdout(predicate::str::contains("2,100,meals,10,pending"));
}
