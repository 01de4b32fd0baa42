//! Domain layer: value types, the expense state machine, the policy
//! evaluator, and the ports the application layer depends on.

pub mod expense;
pub mod money;
pub mod notification;
pub mod payment;
pub mod policy;
pub mod ports;
pub mod user;
