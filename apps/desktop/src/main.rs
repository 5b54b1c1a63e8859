use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{config::parse_base_url, load_settings, SupportApi, SupportClient};
use shared::{
    domain::{EscalationLogEntry, SubmissionResult, TicketSubmission},
    error::SupportError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "support-hub", about = "Submit support tickets and browse escalations")]
struct Args {
    /// Overrides the configured service base url.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a ticket for triage.
    Submit {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        description: String,
    },
    /// List escalated tickets.
    Logs {
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(debug: bool, config_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config_level.unwrap_or("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut settings = load_settings()?;
    init_logging(args.debug, settings.log_level.as_deref());

    if let Some(base_url) = &args.base_url {
        settings.base_url = parse_base_url(base_url)?;
    }
    tracing::debug!(base_url = %settings.base_url, "settings loaded");
    let client = SupportClient::from_settings(&settings)?;

    let code = match args.command {
        Command::Submit {
            subject,
            description,
        } => submit(&client, TicketSubmission::new(subject, description)).await,
        Command::Logs { json } => logs(&client, json).await?,
    };
    Ok(code)
}

async fn submit(client: &SupportClient, ticket: TicketSubmission) -> ExitCode {
    let result = match client.submit_ticket(&ticket).await {
        Ok(result) => result,
        Err(SupportError::Validation(err)) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
        Err(SupportError::Transport(err)) => {
            tracing::error!("submit error: {err}");
            SubmissionResult::generic_failure()
        }
    };

    if result.is_success() {
        println!("✔ {}", result.message);
        ExitCode::SUCCESS
    } else {
        eprintln!("✘ {}", result.message);
        ExitCode::FAILURE
    }
}

async fn logs(client: &SupportClient, json: bool) -> Result<ExitCode> {
    let entries = match client.fetch_logs().await {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Failed to load escalation logs: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No Escalations Found");
        println!("All tickets are being handled smoothly!");
    } else {
        for entry in &entries {
            print_entry(entry);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_entry(entry: &EscalationLogEntry) {
    println!(
        "[{}] {}  (attempts: {})",
        entry.category_label(),
        entry.subject,
        entry.review_attempts
    );
    if let Some(at) = entry.escalated_at() {
        println!("  escalated: {at}");
    }
    if !entry.description.is_empty() {
        println!("  {}", entry.description);
    }
    for issue in entry.issue_list() {
        println!("  - {issue}");
    }
    println!();
}
