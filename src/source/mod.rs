pub mod mock;
pub mod remote;

use async_trait::async_trait;
use serde::Serialize;

use crate::consts::UNCONFIGURED_ENDPOINT;
use crate::quote::{Category, QuoteResult};

/// Trigger name the webhook expects in every request.
pub const TRIGGER: &str = "daily_quote";

/// Why a quote could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The webhook answered with a non-success HTTP status.
    #[error("HTTP error! status code: {status}")]
    Transport { status: u16 },
    /// The webhook answered, but not with a usable `{success, data}` envelope.
    #[error("invalid response format: {0}")]
    Protocol(String),
    /// The webhook could not be reached at all.
    #[error("could not reach the quote service: {0}")]
    Network(#[from] reqwest::Error),
}

/// Request body sent to the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequest {
    pub trigger: &'static str,
    pub category: Option<Category>,
    pub timestamp: String,
}

impl QuoteRequest {
    pub fn new(category: Option<Category>) -> Self {
        Self {
            trigger: TRIGGER,
            category,
            timestamp: crate::consts::now_iso8601(),
        }
    }
}

/// Where quotes come from. The webhook, the built-in table, or a test double.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short label for banners and logs.
    fn name(&self) -> &str;

    async fn fetch(&self, category: Option<Category>) -> Result<QuoteResult, QuoteError>;
}

/// True when `endpoint` points at a real webhook.
pub fn is_configured(endpoint: Option<&str>) -> bool {
    endpoint
        .map(str::trim)
        .is_some_and(|e| !e.is_empty() && e != UNCONFIGURED_ENDPOINT)
}

/// Pick the webhook when one is configured, the built-in table otherwise.
pub fn select_source(endpoint: Option<&str>) -> Box<dyn QuoteSource> {
    match endpoint {
        Some(url) if is_configured(Some(url)) => {
            tracing::debug!(endpoint = url, "using remote quote source");
            Box::new(remote::RemoteQuoteSource::new(url.trim()))
        }
        _ => {
            tracing::warn!("webhook URL is not configured, using built-in quotes");
            Box::new(mock::MockQuoteSource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_blank_are_unconfigured() {
        assert!(!is_configured(None));
        assert!(!is_configured(Some("")));
        assert!(!is_configured(Some("   ")));
        assert!(!is_configured(Some(UNCONFIGURED_ENDPOINT)));
        assert!(is_configured(Some("http://localhost:5678/webhook")));
    }

    #[test]
    fn select_source_picks_mock_when_unconfigured() {
        assert_eq!(select_source(None).name(), "built-in");
        assert_eq!(select_source(Some(UNCONFIGURED_ENDPOINT)).name(), "built-in");
    }

    #[test]
    fn select_source_picks_remote_when_configured() {
        assert_eq!(select_source(Some("http://127.0.0.1:9/hook")).name(), "webhook");
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(QuoteRequest::new(Some(Category::Love))).unwrap();
        assert_eq!(body["trigger"], "daily_quote");
        assert_eq!(body["category"], "love");
        assert!(body["timestamp"].as_str().unwrap().contains('T'));

        let body = serde_json::to_value(QuoteRequest::new(None)).unwrap();
        assert!(body["category"].is_null());
    }

    #[test]
    fn transport_error_mentions_status() {
        let err = QuoteError::Transport { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
