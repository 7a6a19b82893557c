use async_trait::async_trait;

use super::{QuoteError, QuoteRequest, QuoteSource};
use crate::quote::{Category, Envelope, QuoteResult};

/// Calls the automation webhook once per request.
pub struct RemoteQuoteSource {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteQuoteSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Pull the payload out of a webhook response body.
    fn parse_response(body: &str) -> Result<QuoteResult, QuoteError> {
        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|e| QuoteError::Protocol(format!("not a quote envelope: {e}")))?;

        if !envelope.success {
            return Err(QuoteError::Protocol("service reported failure".to_string()));
        }
        envelope
            .data
            .ok_or_else(|| QuoteError::Protocol("response has no data".to_string()))
    }
}

#[async_trait]
impl QuoteSource for RemoteQuoteSource {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn fetch(&self, category: Option<Category>) -> Result<QuoteResult, QuoteError> {
        let body = QuoteRequest::new(category);
        tracing::debug!(endpoint = %self.endpoint, ?category, "requesting quote");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            tracing::debug!(status, "webhook returned non-success status");
            return Err(QuoteError::Transport { status });
        }

        let text = resp.text().await?;
        Self::parse_response(&text)
    }
}
