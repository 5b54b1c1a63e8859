use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Timestamp layout the triage service writes into escalation records.
pub const ESCALATION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label shown for escalations the service did not categorize.
pub const UNCATEGORIZED_LABEL: &str = "General";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSubmission {
    pub subject: String,
    pub description: String,
}

impl TicketSubmission {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
        }
    }

    /// Both fields must carry non-whitespace text before anything is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.subject.trim().is_empty() {
            missing.push("subject");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    pub fn clear(&mut self) {
        self.subject.clear();
        self.description.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.subject.is_empty() && self.description.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    Success,
    Error,
    Other(String),
}

impl SubmissionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for SubmissionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<SubmissionStatus> for String {
    fn from(value: SubmissionStatus) -> Self {
        match value {
            SubmissionStatus::Success => "success".to_string(),
            SubmissionStatus::Error => "error".to_string(),
            SubmissionStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub message: String,
}

impl SubmissionResult {
    pub const GENERIC_FAILURE_MESSAGE: &'static str = "Failed to submit ticket.";

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: SubmissionStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SubmissionStatus::Error,
            message: message.into(),
        }
    }

    /// Result recorded when the round trip itself failed.
    pub fn generic_failure() -> Self {
        Self::error(Self::GENERIC_FAILURE_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// A ticket the triage service escalated to human review.
///
/// Records are owned by the service; the client only ever holds read-only
/// copies. Decoding is lenient because the service serializes them straight
/// out of a CSV table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationLogEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub review_attempts: u32,
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub issues: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub draft_response: Option<String>,
}

impl EscalationLogEntry {
    pub fn category_class(&self) -> CategoryClass {
        CategoryClass::classify(self.category.as_deref())
    }

    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED_LABEL,
        }
    }

    pub fn escalated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, ESCALATION_TIMESTAMP_FORMAT).ok()
    }

    pub fn issue_list(&self) -> Vec<&str> {
        self.issues
            .as_deref()
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|issue| !issue.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryClass {
    Urgent,
    High,
    Medium,
    Low,
    Default,
}

/// Badge colors as RGB triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgePalette {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub border: [u8; 3],
}

impl CategoryClass {
    pub const ALL: [CategoryClass; 5] = [
        CategoryClass::Urgent,
        CategoryClass::High,
        CategoryClass::Medium,
        CategoryClass::Low,
        CategoryClass::Default,
    ];

    /// Case-insensitive; anything outside the fixed set is `Default`.
    pub fn classify(category: Option<&str>) -> Self {
        let Some(category) = category else {
            return Self::Default;
        };
        match category.trim().to_ascii_lowercase().as_str() {
            "urgent" => Self::Urgent,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Default,
        }
    }

    pub fn palette(self) -> BadgePalette {
        match self {
            Self::Urgent => BadgePalette {
                background: [254, 226, 226],
                text: [153, 27, 27],
                border: [254, 202, 202],
            },
            Self::High => BadgePalette {
                background: [255, 237, 213],
                text: [154, 52, 18],
                border: [254, 215, 170],
            },
            Self::Medium => BadgePalette {
                background: [254, 249, 195],
                text: [133, 77, 14],
                border: [254, 240, 138],
            },
            Self::Low => BadgePalette {
                background: [220, 252, 231],
                text: [22, 101, 52],
                border: [187, 247, 208],
            },
            Self::Default => BadgePalette {
                background: [204, 251, 241],
                text: [17, 94, 89],
                border: [153, 246, 228],
            },
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(0),
        serde_json::Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
