use crate::application::command::Command;
use crate::domain::expense::ExpenseSubmission;
use crate::domain::money::Amount;
use crate::domain::payment::PaymentConfirmation;
use crate::domain::policy::Category;
use crate::error::{ExpenseError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Admin,
    Manager,
    Deactivate,
    Employee,
    Policy,
    Unpolicy,
    Submit,
    Approve,
    Reject,
    Pay,
    Verify,
}

/// One row of a command file: `command,actor,subject,category,amount,detail`.
///
/// `actor` is the authenticated user issuing the command. `subject` is the
/// expense id for claim commands and the target user for account commands.
/// `detail` carries emails, descriptions, rejection reasons and, for
/// `verify`, `order_id:payment_id:signature`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub command: CommandKind,
    pub actor: u32,
    pub subject: Option<u32>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub detail: Option<String>,
}

fn required<T>(value: Option<T>, field: &str, kind: CommandKind) -> Result<T> {
    value.ok_or_else(|| {
        ExpenseError::ValidationError(format!("{kind:?} command is missing '{field}'"))
    })
}

fn parse_confirmation(detail: &str) -> Result<PaymentConfirmation> {
    let mut parts = detail.splitn(3, ':').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(order_id), Some(payment_id), Some(signature))
            if !order_id.is_empty() && !payment_id.is_empty() && !signature.is_empty() =>
        {
            Ok(PaymentConfirmation {
                order_id: order_id.to_string(),
                payment_id: payment_id.to_string(),
                signature: signature.to_string(),
            })
        }
        _ => Err(ExpenseError::ValidationError(
            "verify detail must be order_id:payment_id:signature".to_string(),
        )),
    }
}

impl TryFrom<CommandRecord> for Command {
    type Error = ExpenseError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let kind = record.command;
        let actor = record.actor;
        let command = match kind {
            CommandKind::Admin => Command::RegisterAdmin {
                id: actor,
                email: required(record.detail, "detail", kind)?,
            },
            CommandKind::Manager => Command::RegisterManager {
                admin: actor,
                id: required(record.subject, "subject", kind)?,
                email: required(record.detail, "detail", kind)?,
            },
            CommandKind::Deactivate => Command::DeactivateManager {
                admin: actor,
                id: required(record.subject, "subject", kind)?,
            },
            CommandKind::Employee => Command::RegisterEmployee {
                id: actor,
                manager: record.subject,
                email: required(record.detail, "detail", kind)?,
            },
            CommandKind::Policy => Command::SetPolicy {
                admin: actor,
                category: Category::new(&required(record.category, "category", kind)?)?,
                limit: Amount::new(required(record.amount, "amount", kind)?)?,
            },
            CommandKind::Unpolicy => Command::RemovePolicy {
                admin: actor,
                category: Category::new(&required(record.category, "category", kind)?)?,
            },
            CommandKind::Submit => Command::Submit {
                employee: actor,
                submission: ExpenseSubmission {
                    id: required(record.subject, "subject", kind)?,
                    category: Category::new(&required(record.category, "category", kind)?)?,
                    amount: Amount::new(required(record.amount, "amount", kind)?)?,
                    description: record.detail.unwrap_or_default(),
                },
            },
            CommandKind::Approve => Command::Approve {
                manager: actor,
                expense: required(record.subject, "subject", kind)?,
            },
            CommandKind::Reject => Command::Reject {
                manager: actor,
                expense: required(record.subject, "subject", kind)?,
                reason: required(record.detail, "detail", kind)?,
            },
            CommandKind::Pay => Command::InitiatePayment {
                manager: actor,
                expense: required(record.subject, "subject", kind)?,
            },
            // The gateway callback carries no user; `actor` is ignored.
            CommandKind::Verify => Command::VerifyPayment {
                expense: required(record.subject, "subject", kind)?,
                confirmation: parse_confirmation(&required(record.detail, "detail", kind)?)?,
            },
        };
        Ok(command)
    }
}

/// Reads workflow commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Command>`.
/// It handles whitespace trimming and short records automatically.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads, deserializes and validates commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| result.map_err(ExpenseError::from).and_then(Command::try_from))
    }
}
