//! Executes store effects against a [`SupportApi`] on the tokio runtime.

use std::sync::Arc;

use shared::{
    domain::{SubmissionResult, TicketSubmission},
    error::SupportError,
    protocol::LogSnapshot,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    store::{Action, Effect, RequestId},
    SupportApi,
};

pub struct EffectHandle {
    task: JoinHandle<()>,
}

impl EffectHandle {
    /// Waits for the effect; `false` when it was aborted by a newer request.
    pub async fn finished(self) -> bool {
        self.task.await.is_ok()
    }
}

pub struct EffectRunner {
    api: Arc<dyn SupportApi>,
    inflight_fetch: Option<(RequestId, tokio::task::AbortHandle)>,
}

impl EffectRunner {
    pub fn new(api: Arc<dyn SupportApi>) -> Self {
        Self {
            api,
            inflight_fetch: None,
        }
    }

    /// Log fetch that is still running, if any.
    pub fn fetch_in_flight(&self) -> Option<RequestId> {
        self.inflight_fetch
            .as_ref()
            .filter(|(_, abort)| !abort.is_finished())
            .map(|(request_id, _)| *request_id)
    }

    /// Spawns the request behind `effect` and reports its outcome through
    /// `on_action`. Must be called from within a tokio runtime.
    pub fn run<F>(&mut self, effect: Effect, on_action: F) -> EffectHandle
    where
        F: Fn(Action) + Send + 'static,
    {
        match effect {
            Effect::SubmitTicket(ticket) => {
                let api = Arc::clone(&self.api);
                EffectHandle {
                    task: tokio::spawn(async move {
                        let action = submit_outcome(api.as_ref(), &ticket).await;
                        on_action(action);
                    }),
                }
            }
            Effect::FetchLogs { request_id } => {
                if let Some((previous, abort)) = self.inflight_fetch.take() {
                    if !abort.is_finished() {
                        debug!(previous = previous.0, next = request_id.0, "aborting superseded log fetch");
                        abort.abort();
                    }
                }
                let api = Arc::clone(&self.api);
                let task = tokio::spawn(async move {
                    let action = fetch_outcome(api.as_ref(), request_id).await;
                    on_action(action);
                });
                self.inflight_fetch = Some((request_id, task.abort_handle()));
                EffectHandle { task }
            }
        }
    }
}

async fn submit_outcome(api: &dyn SupportApi, ticket: &TicketSubmission) -> Action {
    match api.submit_ticket(ticket).await {
        Ok(result) => Action::SubmitFinished(result),
        Err(SupportError::Validation(err)) => Action::SubmitRejected(err.to_string()),
        Err(SupportError::Transport(err)) => {
            warn!("ticket submission failed: {err}");
            Action::SubmitFinished(SubmissionResult::generic_failure())
        }
    }
}

async fn fetch_outcome(api: &dyn SupportApi, request_id: RequestId) -> Action {
    match api.fetch_logs().await {
        Ok(entries) => Action::LogsLoaded {
            request_id,
            snapshot: LogSnapshot::new(entries),
        },
        Err(err) => {
            warn!(request_id = request_id.0, "escalation log fetch failed: {err}");
            Action::LogsFailed {
                request_id,
                message: format!("Failed to load escalation logs: {err}"),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
