//! Application layer containing the workflow orchestration.
//!
//! `ExpenseEngine` is the entry point for every workflow command. It owns the
//! storage ports, the notification dispatcher and the payment gateway.

pub mod command;
pub mod engine;
pub mod notifier;
