mod backend_bridge;
mod controller;
mod ui;

use anyhow::Result;
use clap::Parser;
use client_core::{config::parse_base_url, load_settings, Section};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, SupportHubApp};

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the configured service base url.
    #[arg(long)]
    base_url: Option<String>,
    /// Open on the escalation log view instead of the ticket form.
    #[arg(long)]
    logs: bool,
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings()?;

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(settings.log_level.as_deref().unwrap_or("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(base_url) = &args.base_url {
        settings.base_url = parse_base_url(base_url)?;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let startup = StartupConfig {
        initial_section: if args.logs {
            Section::Escalation
        } else {
            Section::Query
        },
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Support Hub")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Support Hub",
        options,
        Box::new(move |_cc| Ok(Box::new(SupportHubApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run desktop gui: {err}"))
}
