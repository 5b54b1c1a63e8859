use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
}

/// Local precondition failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Fill all fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("a ticket submission is already in flight")]
    SubmissionInFlight,
}

/// Anything that went wrong between sending a request and decoding its body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("HTTP error! status: {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("malformed response body: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(" ({detail})"),
        _ => String::new(),
    }
}

impl TransportError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SupportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Serializable form of a failure, suitable for handing to a UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&SupportError> for ApiError {
    fn from(value: &SupportError) -> Self {
        Self::new(value.kind(), value.to_string())
    }
}

impl From<SupportError> for ApiError {
    fn from(value: SupportError) -> Self {
        Self::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_detail() {
        let err = TransportError::Status {
            status: 404,
            detail: Some("CSV file not found".into()),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 404 (CSV file not found)");
        assert_eq!(err.status_code(), Some(404));

        let bare = TransportError::Status {
            status: 502,
            detail: None,
        };
        assert_eq!(bare.to_string(), "HTTP error! status: 502");
    }

    #[test]
    fn support_error_reports_kind() {
        let err = SupportError::from(ValidationError::MissingFields(vec!["subject"]));
        assert!(err.is_validation());
        let api = ApiError::from(&err);
        assert_eq!(api.kind, ErrorKind::Validation);
        assert_eq!(api.message, "Fill all fields (missing: subject)");
    }
}
