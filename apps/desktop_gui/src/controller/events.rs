//! Backend-to-UI events and error modeling for the desktop GUI controller.

use client_core::Action;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    /// Outcome of a request, to be applied to the store.
    Action(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SubmitTicket,
    FetchLogs,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("fill all fields")
            || message_lower.contains("missing")
            || message_lower.contains("already in flight")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("http error")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("malformed")
            || message_lower.contains("disconnected")
            || message_lower.contains("queue is full")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status banner.
    pub fn banner_text(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Backend worker",
            UiErrorContext::SubmitTicket => "Ticket submission",
            UiErrorContext::FetchLogs => "Escalation logs",
        };
        format!("{prefix}: {}", self.message)
    }
}
