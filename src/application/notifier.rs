use crate::domain::expense::Expense;
use crate::domain::notification::{ExpenseEvent, Notification};
use crate::domain::ports::MailerBox;

/// Renders status-change emails and hands them to the mail transport.
///
/// Delivery is best effort: the state change that triggered a notification is
/// already persisted when `dispatch` runs, so a failed send is logged and
/// reported through the return value only.
pub struct NotificationDispatcher {
    mailer: MailerBox,
}

impl NotificationDispatcher {
    pub fn new(mailer: MailerBox) -> Self {
        Self { mailer }
    }

    /// Returns whether the mailer accepted the message.
    pub async fn dispatch(&self, event: ExpenseEvent, expense: &Expense, to: &str) -> bool {
        let notification = Notification::render(&event, expense, to);
        match self.mailer.send(&notification).await {
            Ok(()) => {
                tracing::debug!(expense = expense.id, to, subject = %notification.subject, "notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(expense = expense.id, to, error = %e, "notification delivery failed");
                false
            }
        }
    }
}
