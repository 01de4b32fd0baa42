use clap::Parser;
use expense_engine::application::engine::{ExpenseEngine, Stores};
use expense_engine::application::notifier::NotificationDispatcher;
use expense_engine::config::{Config, GatewaySettings, MailSettings};
use expense_engine::domain::ports::{MailerBox, PaymentGatewayBox};
use expense_engine::infrastructure::gateway::{HttpPaymentGateway, SandboxGateway};
use expense_engine::infrastructure::mail::{LogMailer, ResendMailer};
use expense_engine::interfaces::csv::command_reader::CommandReader;
use expense_engine::interfaces::csv::expense_writer::ExpenseWriter;
use expense_engine::logging::init_logging;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;

fn build_stores(config: &Config) -> Result<Stores> {
    match &config.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            use expense_engine::infrastructure::rocksdb::RocksDBStore;

            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            Ok(Stores {
                expenses: Box::new(store.clone()),
                policies: Box::new(store.clone()),
                users: Box::new(store),
            })
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Stores::in_memory())
        }
        None => Ok(Stores::in_memory()),
    }
}

fn build_gateway(config: &Config) -> Result<PaymentGatewayBox> {
    let gateway: PaymentGatewayBox = match config.gateway() {
        GatewaySettings::Sandbox { key_secret } => Box::new(SandboxGateway::new(&key_secret)),
        GatewaySettings::Http {
            base_url,
            key_id,
            key_secret,
        } => Box::new(HttpPaymentGateway::new(&base_url, &key_id, &key_secret).into_diagnostic()?),
    };
    Ok(gateway)
}

fn build_mailer(config: &Config) -> MailerBox {
    match config.mail() {
        MailSettings::Log => Box::new(LogMailer),
        MailSettings::Resend { api_key, from } => Box::new(ResendMailer::new(&api_key, &from)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = Config::parse();
    config.validate().into_diagnostic()?;

    let engine = ExpenseEngine::new(
        build_stores(&config)?,
        NotificationDispatcher::new(build_mailer(&config)),
        build_gateway(&config)?,
        &config.currency,
    );

    // Replay commands; a failed command is logged and skipped
    let file = File::open(&config.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for (line, command) in reader.commands().enumerate() {
        match command {
            Ok(command) => {
                let name = command.name();
                if let Err(e) = engine.execute(command).await {
                    tracing::warn!(record = line + 1, command = name, error = %e, "command rejected");
                }
            }
            Err(e) => {
                tracing::warn!(record = line + 1, error = %e, "unreadable command");
            }
        }
    }

    let expenses = engine.expenses().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = ExpenseWriter::new(stdout.lock());
    writer.write_expenses(&expenses).into_diagnostic()?;

    Ok(())
}
