use crate::domain::expense::ExpenseSubmission;
use crate::domain::money::Amount;
use crate::domain::payment::PaymentConfirmation;
use crate::domain::policy::Category;

/// A single request to the expense workflow, already attributed to an
/// authenticated actor.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RegisterAdmin {
        id: u32,
        email: String,
    },
    RegisterManager {
        admin: u32,
        id: u32,
        email: String,
    },
    DeactivateManager {
        admin: u32,
        id: u32,
    },
    RegisterEmployee {
        id: u32,
        manager: Option<u32>,
        email: String,
    },
    SetPolicy {
        admin: u32,
        category: Category,
        limit: Amount,
    },
    RemovePolicy {
        admin: u32,
        category: Category,
    },
    Submit {
        employee: u32,
        submission: ExpenseSubmission,
    },
    Approve {
        manager: u32,
        expense: u32,
    },
    Reject {
        manager: u32,
        expense: u32,
        reason: String,
    },
    InitiatePayment {
        manager: u32,
        expense: u32,
    },
    VerifyPayment {
        expense: u32,
        confirmation: PaymentConfirmation,
    },
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::RegisterAdmin { .. } => "admin",
            Command::RegisterManager { .. } => "manager",
            Command::DeactivateManager { .. } => "deactivate",
            Command::RegisterEmployee { .. } => "employee",
            Command::SetPolicy { .. } => "policy",
            Command::RemovePolicy { .. } => "unpolicy",
            Command::Submit { .. } => "submit",
            Command::Approve { .. } => "approve",
            Command::Reject { .. } => "reject",
            Command::InitiatePayment { .. } => "pay",
            Command::VerifyPayment { .. } => "verify",
        }
    }
}
