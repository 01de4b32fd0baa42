//! Mail transports.

use crate::domain::notification::Notification;
use crate::domain::ports::Mailer;
use crate::error::{ExpenseError, Result};
use async_trait::async_trait;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;

/// Delivers notifications through the Resend HTTP API.
pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: &str, from: &str) -> Self {
        Self {
            client: Resend::new(api_key),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let to = [notification.to.as_str()];
        let email = CreateEmailBaseOptions::new(&self.from, to, &notification.subject)
            .with_text(&notification.body);
        self.client
            .emails
            .send(email)
            .await
            .map_err(|e| ExpenseError::MailError(e.to_string()))?;
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them. Used when no mail
/// API key is configured.
#[derive(Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "mail delivery disabled, notification logged"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        let notification = Notification {
            to: "emp@example.com".to_string(),
            subject: "Expense #1 approved".to_string(),
            body: "approved".to_string(),
        };
        assert!(LogMailer.send(&notification).await.is_ok());
    }
}
