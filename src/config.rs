//! Command-line and environment configuration.

use crate::error::{ExpenseError, Result};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_SANDBOX_SECRET: &str = "sandbox-secret";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input workflow commands CSV file
    pub input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Currency for payment orders (ISO 4217 code)
    #[arg(long, env = "EXPENSE_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// Base URL of the payment gateway's REST API. Without it the sandbox gateway is used.
    #[arg(long, env = "PAYMENT_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// Payment gateway key id
    #[arg(long, env = "PAYMENT_KEY_ID")]
    pub gateway_key_id: Option<String>,

    /// Payment gateway key secret, also used to check payment signatures
    #[arg(long, env = "PAYMENT_KEY_SECRET", default_value = DEFAULT_SANDBOX_SECRET, hide_env_values = true)]
    pub gateway_key_secret: String,

    /// Resend API key. Without it notifications are only logged.
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Sender address for notification emails
    #[arg(long, env = "MAIL_FROM", default_value = "expenses@localhost")]
    pub mail_from: String,
}

/// Which payment gateway adapter to build.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewaySettings {
    Sandbox {
        key_secret: String,
    },
    Http {
        base_url: String,
        key_id: String,
        key_secret: String,
    },
}

/// Which mail transport to build.
#[derive(Debug, Clone, PartialEq)]
pub enum MailSettings {
    Log,
    Resend { api_key: String, from: String },
}

impl Config {
    /// Checks values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ExpenseError::ValidationError(format!(
                "currency '{}' must be a three-letter uppercase code",
                self.currency
            )));
        }
        if self.gateway_key_secret.is_empty() {
            return Err(ExpenseError::ValidationError(
                "payment gateway key secret must not be empty".to_string(),
            ));
        }
        if self.gateway_url.is_some() != self.gateway_key_id.is_some() {
            return Err(ExpenseError::ValidationError(
                "gateway URL and key id must be given together".to_string(),
            ));
        }
        if self.gateway_url.is_some() && self.gateway_key_secret == DEFAULT_SANDBOX_SECRET {
            return Err(ExpenseError::ValidationError(
                "a live payment gateway needs its own key secret, not the sandbox default"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn gateway(&self) -> GatewaySettings {
        match (&self.gateway_url, &self.gateway_key_id) {
            (Some(base_url), Some(key_id)) => GatewaySettings::Http {
                base_url: base_url.clone(),
                key_id: key_id.clone(),
                key_secret: self.gateway_key_secret.clone(),
            },
            _ => GatewaySettings::Sandbox {
                key_secret: self.gateway_key_secret.clone(),
            },
        }
    }

    pub fn mail(&self) -> MailSettings {
        match &self.resend_api_key {
            Some(api_key) if !api_key.is_empty() => MailSettings::Resend {
                api_key: api_key.clone(),
                from: self.mail_from.clone(),
            },
            _ => MailSettings::Log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["expense-engine", "commands.csv"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_sandbox_config() {
        let config = parse(&["--currency", "USD", "--gateway-key-secret", "s3cret"]);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.gateway(),
            GatewaySettings::Sandbox {
                key_secret: "s3cret".to_string()
            }
        );
    }

    #[test]
    fn test_http_gateway_selected_with_url_and_key() {
        let config = parse(&[
            "--currency",
            "INR",
            "--gateway-url",
            "https://gateway.example/v1",
            "--gateway-key-id",
            "key_1",
            "--gateway-key-secret",
            "s3cret",
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.gateway(),
            GatewaySettings::Http {
                base_url: "https://gateway.example/v1".to_string(),
                key_id: "key_1".to_string(),
                key_secret: "s3cret".to_string(),
            }
        );
    }

    #[test]
    fn test_gateway_url_without_key_is_invalid() {
        let mut config = parse(&["--currency", "INR"]);
        config.gateway_url = Some("https://gateway.example/v1".to_string());
        config.gateway_key_id = None;
        assert!(matches!(
            config.validate(),
            Err(ExpenseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_http_gateway_rejects_sandbox_secret() {
        let config = parse(&[
            "--currency",
            "INR",
            "--gateway-url",
            "https://gateway.example/v1",
            "--gateway-key-id",
            "key_1",
        ]);
        assert_eq!(config.gateway_key_secret, DEFAULT_SANDBOX_SECRET);
        assert!(matches!(
            config.validate(),
            Err(ExpenseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_currency_validation() {
        let config = parse(&["--currency", "rupees"]);
        assert!(matches!(
            config.validate(),
            Err(ExpenseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_mail_settings() {
        let mut config = parse(&["--mail-from", "ops@example.com"]);
        config.resend_api_key = Some("re_123".to_string());
        assert_eq!(
            config.mail(),
            MailSettings::Resend {
                api_key: "re_123".to_string(),
                from: "ops@example.com".to_string(),
            }
        );

        config.resend_api_key = None;
        assert_eq!(config.mail(), MailSettings::Log);
    }
}
