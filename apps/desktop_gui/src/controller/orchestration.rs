//! Command orchestration from store effects to the backend command queue.

use client_core::{Action, Effect, SupportState};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::SubmissionResult;

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. On failure the command is handed
/// back so the caller can settle whatever state it left pending.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), BackendCommand> {
    let cmd_name = match &cmd {
        BackendCommand::Run(Effect::SubmitTicket(_)) => "submit_ticket",
        BackendCommand::Run(Effect::FetchLogs { .. }) => "fetch_logs",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err(cmd)
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status = "Backend command processor disconnected (possible startup/runtime failure)"
                .to_string();
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(cmd)
        }
    }
}

/// Applies `action` to the store and forwards any resulting effect.
pub fn dispatch_action(
    state: &mut SupportState,
    cmd_tx: &Sender<BackendCommand>,
    action: Action,
    status: &mut String,
) {
    let Some(effect) = state.apply(action) else {
        return;
    };
    if let Err(BackendCommand::Run(effect)) =
        dispatch_backend_command(cmd_tx, BackendCommand::Run(effect), status)
    {
        // Outcome actions never produce further effects.
        let _ = state.apply(undeliverable_outcome(effect, status));
    }
}

/// Outcome recorded for an effect the backend never received.
fn undeliverable_outcome(effect: Effect, status: &str) -> Action {
    match effect {
        Effect::SubmitTicket(_) => Action::SubmitFinished(SubmissionResult::generic_failure()),
        Effect::FetchLogs { request_id } => Action::LogsFailed {
            request_id,
            message: format!("Failed to load escalation logs: {status}"),
        },
    }
}
