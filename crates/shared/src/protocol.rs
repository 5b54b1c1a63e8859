use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{EscalationLogEntry, SubmissionResult, TicketSubmission};

pub const QUERY_PATH: &str = "query";
pub const ESCALATION_LOGS_PATH: &str = "escalation-logs";

/// Header that suppresses the tunnel provider's browser interstitial.
pub const TUNNEL_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

pub type QueryRequest = TicketSubmission;
pub type QueryResponse = SubmissionResult;

/// Body the service returns alongside 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

impl ServiceErrorBody {
    pub fn parse(raw: &str) -> Option<String> {
        serde_json::from_str::<ServiceErrorBody>(raw)
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLogs {
    pub entries: Vec<EscalationLogEntry>,
    /// Elements dropped because they were not objects.
    pub skipped: usize,
    /// The payload was not an array at all and was treated as empty.
    pub coerced: bool,
}

/// Decodes an escalation log payload without ever failing.
///
/// Order of the array is preserved.
pub fn decode_escalation_logs(payload: Value) -> DecodedLogs {
    let Value::Array(items) = payload else {
        return DecodedLogs {
            coerced: true,
            ..DecodedLogs::default()
        };
    };

    let mut decoded = DecodedLogs::default();
    for item in items {
        if !item.is_object() {
            decoded.skipped += 1;
            continue;
        }
        match serde_json::from_value::<EscalationLogEntry>(item) {
            Ok(entry) => decoded.entries.push(entry),
            Err(_) => decoded.skipped += 1,
        }
    }
    decoded
}

/// Read-only copy of the service's escalation records at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSnapshot {
    pub entries: Vec<EscalationLogEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl LogSnapshot {
    pub fn new(entries: Vec<EscalationLogEntry>) -> Self {
        Self {
            entries,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn non_array_payload_is_coerced_to_empty() {
        for payload in [json!({"error": "nope"}), json!(null), json!("text"), json!(7)] {
            let decoded = decode_escalation_logs(payload);
            assert!(decoded.entries.is_empty());
            assert!(decoded.coerced);
        }
    }

    #[test]
    fn array_payload_keeps_order_and_skips_non_objects() {
        let decoded = decode_escalation_logs(json!([
            {"subject": "A", "category": "urgent", "review_attempts": 2},
            42,
            {"subject": "B", "category": "low", "review_attempts": 1},
        ]));

        let subjects: Vec<_> = decoded.entries.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["A", "B"]);
        assert_eq!(decoded.skipped, 1);
        assert!(!decoded.coerced);
    }

    #[test]
    fn service_error_body_extracts_message() {
        assert_eq!(
            ServiceErrorBody::parse(r#"{"error":"CSV file not found"}"#),
            Some("CSV file not found".to_string())
        );
        assert_eq!(ServiceErrorBody::parse("<html>"), None);
        assert_eq!(ServiceErrorBody::parse(r#"{"error":""}"#), None);
    }
}
