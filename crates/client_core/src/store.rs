//! Single source of truth for the support client's UI state.
//!
//! Every request lifecycle is a sequence of [`Action`]s applied by [`reduce`].
//! The reducer never performs I/O; it returns an [`Effect`] describing the
//! request the caller must run, and the outcome comes back as another action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{EscalationLogEntry, SubmissionResult, TicketSubmission},
    error::ValidationError,
    protocol::LogSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Query,
    Escalation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    Navigate(Section),
    EditSubject(String),
    EditDescription(String),
    Submit,
    SubmitRejected(String),
    SubmitFinished(SubmissionResult),
    DismissResult,
    RefreshLogs,
    LogsLoaded {
        request_id: RequestId,
        snapshot: LogSnapshot,
    },
    LogsFailed {
        request_id: RequestId,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Effect {
    SubmitTicket(TicketSubmission),
    FetchLogs { request_id: RequestId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportState {
    pub section: Section,
    pub form: TicketSubmission,
    pub submit_in_flight: bool,
    pub last_result: Option<SubmissionResult>,
    /// Local notice for submissions refused before any request was made.
    pub notice: Option<String>,
    pub logs: Vec<EscalationLogEntry>,
    pub logs_fetched_at: Option<DateTime<Utc>>,
    pub logs_loading: bool,
    pub logs_error: Option<String>,
    /// Most recently issued log request; responses for older ids are stale.
    pub logs_request: Option<RequestId>,
    next_request_id: u64,
}

impl SupportState {
    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        reduce(self, action)
    }

    pub fn can_submit(&self) -> bool {
        !self.submit_in_flight
    }

    /// Log view has nothing to show and nothing went wrong.
    pub fn logs_empty(&self) -> bool {
        !self.logs_loading && self.logs.is_empty() && self.logs_error.is_none()
    }

    fn begin_log_request(&mut self) -> Effect {
        self.next_request_id += 1;
        let request_id = RequestId(self.next_request_id);
        self.logs_request = Some(request_id);
        self.logs_loading = true;
        self.logs_error = None;
        Effect::FetchLogs { request_id }
    }

    fn is_current(&self, request_id: RequestId) -> bool {
        self.logs_request == Some(request_id)
    }
}

pub fn reduce(state: &mut SupportState, action: Action) -> Option<Effect> {
    match action {
        Action::Navigate(section) => {
            let entering_logs = section == Section::Escalation && state.section != section;
            state.section = section;
            entering_logs.then(|| state.begin_log_request())
        }
        Action::EditSubject(subject) => {
            state.form.subject = subject;
            None
        }
        Action::EditDescription(description) => {
            state.form.description = description;
            None
        }
        Action::Submit => {
            if state.submit_in_flight {
                state.notice = Some(ValidationError::SubmissionInFlight.to_string());
                return None;
            }
            if let Err(err) = state.form.validate() {
                state.notice = Some(err.to_string());
                return None;
            }
            state.submit_in_flight = true;
            state.last_result = None;
            state.notice = None;
            Some(Effect::SubmitTicket(state.form.clone()))
        }
        Action::SubmitRejected(message) => {
            state.submit_in_flight = false;
            state.notice = Some(message);
            None
        }
        Action::SubmitFinished(result) => {
            state.submit_in_flight = false;
            state.notice = None;
            if result.is_success() {
                state.form.clear();
            }
            state.last_result = Some(result);
            None
        }
        Action::DismissResult => {
            state.last_result = None;
            state.notice = None;
            None
        }
        Action::RefreshLogs => Some(state.begin_log_request()),
        Action::LogsLoaded {
            request_id,
            snapshot,
        } => {
            if state.is_current(request_id) {
                state.logs_loading = false;
                state.logs_error = None;
                state.logs_fetched_at = Some(snapshot.fetched_at);
                state.logs = snapshot.entries;
            }
            None
        }
        Action::LogsFailed {
            request_id,
            message,
        } => {
            if state.is_current(request_id) {
                state.logs_loading = false;
                state.logs.clear();
                state.logs_fetched_at = None;
                state.logs_error = Some(message);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::SubmissionStatus;

    use super::*;

    fn entry(subject: &str) -> EscalationLogEntry {
        EscalationLogEntry {
            subject: subject.to_string(),
            ..EscalationLogEntry::default()
        }
    }

    fn filled_state() -> SupportState {
        let mut state = SupportState::default();
        state.apply(Action::EditSubject("Cannot log in".into()));
        state.apply(Action::EditDescription("Password reset loops".into()));
        state
    }

    #[test]
    fn submit_with_empty_field_emits_no_effect() {
        let mut state = SupportState::default();
        state.apply(Action::EditSubject("Only a subject".into()));

        assert_eq!(state.apply(Action::Submit), None);
        assert!(!state.submit_in_flight);
        assert!(state
            .notice
            .as_deref()
            .is_some_and(|n| n.starts_with("Fill all fields")));
    }

    #[test]
    fn submit_is_single_flight() {
        let mut state = filled_state();
        let effect = state.apply(Action::Submit);
        assert!(matches!(effect, Some(Effect::SubmitTicket(ref t)) if t.subject == "Cannot log in"));
        assert!(!state.can_submit());

        assert_eq!(state.apply(Action::Submit), None);
        assert!(state.submit_in_flight);
    }

    #[test]
    fn success_clears_form() {
        let mut state = filled_state();
        state.apply(Action::Submit);
        state.apply(Action::SubmitFinished(SubmissionResult::success("Resolved")));

        assert!(state.form.is_blank());
        assert!(state.can_submit());
        assert_eq!(
            state.last_result.as_ref().map(|r| r.message.as_str()),
            Some("Resolved")
        );
    }

    #[test]
    fn finished_submission_clears_earlier_notice() {
        let mut state = SupportState::default();
        state.apply(Action::EditSubject("Cannot log in".into()));
        assert_eq!(state.apply(Action::Submit), None);
        assert!(state.notice.is_some());

        state.apply(Action::EditDescription("Password reset loops".into()));
        assert!(state.apply(Action::Submit).is_some());
        assert_eq!(state.apply(Action::Submit), None);
        assert!(state.notice.is_some());

        state.apply(Action::SubmitFinished(SubmissionResult::success("Resolved")));
        assert_eq!(state.notice, None);
        assert!(state.last_result.is_some());
    }

    #[test]
    fn non_success_keeps_form() {
        for status in [
            SubmissionStatus::Error,
            SubmissionStatus::Other("pending".into()),
        ] {
            let mut state = filled_state();
            state.apply(Action::Submit);
            state.apply(Action::SubmitFinished(SubmissionResult {
                status,
                message: "try again".into(),
            }));

            assert_eq!(state.form.subject, "Cannot log in");
            assert_eq!(state.form.description, "Password reset loops");
            assert!(!state.submit_in_flight);
        }
    }

    #[test]
    fn navigating_to_logs_requests_a_fetch_once() {
        let mut state = SupportState::default();
        let effect = state.apply(Action::Navigate(Section::Escalation));
        assert_eq!(
            effect,
            Some(Effect::FetchLogs {
                request_id: RequestId(1)
            })
        );
        assert!(state.logs_loading);

        assert_eq!(state.apply(Action::Navigate(Section::Escalation)), None);
        assert_eq!(state.apply(Action::Navigate(Section::Query)), None);
    }

    #[test]
    fn stale_log_response_is_ignored() {
        let mut state = SupportState::default();
        state.apply(Action::Navigate(Section::Escalation));
        state.apply(Action::RefreshLogs);
        assert_eq!(state.logs_request, Some(RequestId(2)));

        state.apply(Action::LogsLoaded {
            request_id: RequestId(2),
            snapshot: LogSnapshot::new(vec![entry("fresh")]),
        });
        state.apply(Action::LogsLoaded {
            request_id: RequestId(1),
            snapshot: LogSnapshot::new(vec![entry("stale"), entry("stale")]),
        });

        assert_eq!(state.logs.len(), 1);
        assert_eq!(state.logs[0].subject, "fresh");
        assert!(!state.logs_loading);
    }

    #[test]
    fn failed_fetch_clears_list_and_sets_error() {
        let mut state = SupportState::default();
        state.apply(Action::Navigate(Section::Escalation));
        state.apply(Action::LogsLoaded {
            request_id: RequestId(1),
            snapshot: LogSnapshot::new(vec![entry("A")]),
        });

        state.apply(Action::RefreshLogs);
        state.apply(Action::LogsFailed {
            request_id: RequestId(2),
            message: "Failed to load escalation logs: connection refused".into(),
        });

        assert!(state.logs.is_empty());
        assert!(state.logs_error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(!state.logs_empty());
    }

    #[test]
    fn actions_round_trip_through_json() {
        let action = Action::LogsFailed {
            request_id: RequestId(7),
            message: "boom".into(),
        };
        let raw = serde_json::to_string(&action).expect("encode");
        assert!(raw.contains("\"type\":\"logs_failed\""));
        let decoded: Action = serde_json::from_str(&raw).expect("decode");
        assert_eq!(decoded, action);
    }
}
