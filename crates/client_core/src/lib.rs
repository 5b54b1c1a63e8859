use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::Value;
use shared::{
    domain::{EscalationLogEntry, SubmissionResult, TicketSubmission},
    error::{SupportError, TransportError},
    protocol::{
        decode_escalation_logs, QueryResponse, ServiceErrorBody, ESCALATION_LOGS_PATH, QUERY_PATH,
        TUNNEL_WARNING_HEADER,
    },
};
use tracing::{error, info, warn};
use url::Url;

pub mod config;
pub mod runner;
pub mod store;

pub use config::{load_settings, ClientSettings};
pub use runner::{EffectHandle, EffectRunner};
pub use store::{reduce, Action, Effect, RequestId, Section, SupportState};

/// The two calls the triage service exposes.
#[async_trait]
pub trait SupportApi: Send + Sync {
    async fn submit_ticket(
        &self,
        ticket: &TicketSubmission,
    ) -> Result<SubmissionResult, SupportError>;
    async fn fetch_logs(&self) -> Result<Vec<EscalationLogEntry>, SupportError>;
}

pub struct SupportClient {
    http: Client,
    base_url: Url,
    skip_tunnel_warning: bool,
}

impl SupportClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url: config::normalize_base_url(base_url),
            skip_tunnel_warning: true,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SupportError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| TransportError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            base_url: config::normalize_base_url(settings.base_url.clone()),
            skip_tunnel_warning: settings.skip_tunnel_warning,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn submit(
        &self,
        subject: &str,
        description: &str,
    ) -> Result<SubmissionResult, SupportError> {
        self.submit_ticket(&TicketSubmission::new(subject, description))
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|err| TransportError::Network(format!("invalid endpoint '{path}': {err}")))
    }

    fn with_common_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header(header::ACCEPT, "application/json");
        if self.skip_tunnel_warning {
            request.header(TUNNEL_WARNING_HEADER, "true")
        } else {
            request
        }
    }
}

#[async_trait]
impl SupportApi for SupportClient {
    async fn submit_ticket(
        &self,
        ticket: &TicketSubmission,
    ) -> Result<SubmissionResult, SupportError> {
        ticket.validate()?;

        let url = self.endpoint(QUERY_PATH)?;
        info!(%url, subject_len = ticket.subject.len(), "submitting ticket");
        let res = self
            .with_common_headers(self.http.post(url))
            .json(ticket)
            .send()
            .await
            .map_err(map_send_error)?;
        let res = ensure_success(res).await?;
        let body: QueryResponse = decode_body(res).await?;
        info!(status = body.status.as_str(), "ticket submission answered");
        Ok(body)
    }

    async fn fetch_logs(&self) -> Result<Vec<EscalationLogEntry>, SupportError> {
        let url = self.endpoint(ESCALATION_LOGS_PATH)?;
        info!(%url, "fetching escalation logs");
        let res = self
            .with_common_headers(self.http.get(url))
            .send()
            .await
            .map_err(map_send_error)?;
        let res = ensure_success(res).await?;
        let payload: Value = decode_body(res).await?;

        let decoded = decode_escalation_logs(payload);
        if decoded.coerced {
            warn!("escalation log payload was not an array; treating as empty");
        }
        if decoded.skipped > 0 {
            warn!(skipped = decoded.skipped, "dropped malformed escalation log entries");
        }
        info!(count = decoded.entries.len(), "escalation logs received");
        Ok(decoded.entries)
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    error!("request failed: {err}");
    if err.is_timeout() {
        TransportError::Network(format!("request timed out: {err}"))
    } else {
        TransportError::Network(err.to_string())
    }
}

async fn ensure_success(res: Response) -> Result<Response, TransportError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let detail = ServiceErrorBody::parse(&body);
    error!(status = status.as_u16(), detail = ?detail, "service returned an error status");
    Err(TransportError::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn decode_body<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, TransportError> {
    let bytes = res
        .bytes()
        .await
        .map_err(|err| TransportError::Network(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| {
        error!("failed to decode response body: {err}");
        TransportError::Decode(err.to_string())
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
