use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use inbox_assist::config::AssistConfig;
use inbox_assist::mail::{ImapSource, MailSender, SendRequest, SmtpSender};
use inbox_assist::reply::{DraftComposer, FsTemplateStore};
use inbox_assist::triage::{InboxPipeline, Message};

#[derive(Parser)]
#[command(name = "inbox-assist", version)]
#[command(about = "Triage unread email and draft replies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch unread emails and print them by priority
    Check,
    /// Draft a reply to an email (JSON from argument or stdin)
    Draft {
        /// Email JSON: {"from", "subject", "body"}
        json: Option<String>,
    },
    /// Send an email (JSON from argument or stdin)
    Send {
        /// Send JSON: {"to", "subject", "body", "isReply", "originalMessageId", ...}
        json: Option<String>,
    },
    /// Test the SMTP connection
    Verify,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Install rustls crypto provider before any TLS usage
    let _ = rustls::crypto::ring::default_provider().install_default();

    let _log_guard = init_tracing();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<ExitCode> {
    let config = AssistConfig::from_env()?;

    match command {
        Command::Check => {
            let source = ImapSource::new(config.require_mail()?.clone());
            let report = InboxPipeline::default().run(&source).await?;
            print_json(&report)?;

            if !report.emails.is_empty() {
                eprintln!("\n--- Email Summary ---");
                for entry in &report.emails {
                    eprintln!("{}", entry.record.summary());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Draft { json } => {
            let message: Message = read_json(json, "email").await?;
            let templates = Arc::new(FsTemplateStore::new(config.templates_dir.clone()));
            let draft = DraftComposer::new(config, templates).compose(&message).await;
            print_json(&draft)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Send { json } => {
            let request: SendRequest = read_json(json, "send request").await?;
            let sender = SmtpSender::new(config.require_mail()?.clone());
            let outcome = sender.send(&request).await;
            print_json(&outcome)?;
            Ok(exit_code(outcome.is_success()))
        }
        Command::Verify => {
            let sender = SmtpSender::new(config.require_mail()?.clone());
            let outcome = sender.verify().await;
            print_json(&outcome)?;
            Ok(exit_code(outcome.success))
        }
    }
}

/// Parse JSON from the positional argument, or stdin when absent.
async fn read_json<T: DeserializeOwned>(arg: Option<String>, what: &str) -> anyhow::Result<T> {
    let raw = match arg {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).with_context(|| format!("Invalid {what} JSON"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Logs go to stderr (stdout carries JSON), plus a daily file when
/// `INBOX_ASSIST_LOG_DIR` is set.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match std::env::var("INBOX_ASSIST_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "inbox-assist.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}
