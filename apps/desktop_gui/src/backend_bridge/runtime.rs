//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{Action, ClientSettings, EffectRunner, SupportClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match SupportClient::from_settings(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to build support client: {err}");
                    return;
                }
            };
            tracing::info!(base_url = %client.base_url(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            let mut runner = EffectRunner::new(Arc::new(client));
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Run(effect) => {
                        tracing::debug!(?effect, "backend: running effect");
                        let ui_tx = ui_tx.clone();
                        // Completion is reported through the sink; the handle is not awaited.
                        let _ = runner.run(effect, move |action| deliver_outcome(&ui_tx, action));
                    }
                }
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    });
}

/// Posts a request outcome to the UI. The banner is best effort; the action
/// waits for queue space so the store always sees the request settle.
fn deliver_outcome(ui_tx: &Sender<UiEvent>, action: Action) {
    if let Some(err) = banner_error(&action) {
        let _ = ui_tx.try_send(UiEvent::Error(err));
    }
    if ui_tx.send(UiEvent::Action(action)).is_err() {
        tracing::warn!("ui event queue closed; dropping outcome");
    }
}

fn banner_error(action: &Action) -> Option<UiError> {
    match action {
        Action::LogsFailed { message, .. } => Some(UiError::from_message(
            UiErrorContext::FetchLogs,
            message.clone(),
        )),
        Action::SubmitRejected(message) => Some(UiError::from_message(
            UiErrorContext::SubmitTicket,
            message.clone(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use client_core::RequestId;
    use crossbeam_channel::bounded;
    use shared::domain::SubmissionResult;

    use super::*;

    #[test]
    fn outcome_waits_for_a_full_ui_queue() {
        let (ui_tx, ui_rx) = bounded(1);
        ui_tx
            .try_send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("fill queue");

        let drain = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            let mut received = Vec::new();
            while let Ok(event) = ui_rx.recv_timeout(Duration::from_secs(2)) {
                received.push(event);
            }
            received
        });

        deliver_outcome(
            &ui_tx,
            Action::SubmitFinished(SubmissionResult::generic_failure()),
        );
        drop(ui_tx);

        let received = drain.join().expect("drain thread");
        assert!(received.iter().any(|event| matches!(
            event,
            UiEvent::Action(Action::SubmitFinished(result)) if !result.is_success()
        )));
    }

    #[test]
    fn failed_fetch_raises_a_banner_and_an_action() {
        let (ui_tx, ui_rx) = bounded(4);

        deliver_outcome(
            &ui_tx,
            Action::LogsFailed {
                request_id: RequestId(3),
                message: "Failed to load escalation logs: HTTP error! status: 500".into(),
            },
        );

        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Error(err)) if err.context() == UiErrorContext::FetchLogs));
        assert!(matches!(
            ui_rx.try_recv(),
            Ok(UiEvent::Action(Action::LogsFailed { request_id: RequestId(3), .. }))
        ));
    }
}
