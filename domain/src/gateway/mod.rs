//! HTTP adapters for the hosted text-generation providers.

use crate::ai_provider::AiProvider;
use crate::error::Error;
use ai_auth::http::HttpClientBuilder;
use ai_provider::{Error as ProviderError, Provider};
use log::*;
use reqwest::StatusCode;
use service::config::Config;
use std::collections::HashMap;
use std::sync::Arc;

pub mod gemini;
pub mod groq;

pub use gemini::GeminiAdapter;
pub use groq::GroqAdapter;

/// Longest stretch of a provider error body kept in an error message.
const MAX_ERROR_BODY: usize = 500;

/// The adapter serving each provider.
#[derive(Clone, Default)]
pub struct Adapters {
    adapters: HashMap<AiProvider, Arc<dyn Provider>>,
}

impl Adapters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: AiProvider, adapter: Arc<dyn Provider>) -> Self {
        self.adapters.insert(provider, adapter);
        self
    }

    pub fn get(&self, provider: AiProvider) -> Option<Arc<dyn Provider>> {
        self.adapters.get(&provider).cloned()
    }

    /// Gemini and Groq adapters sharing one HTTP client bounded by the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = HttpClientBuilder::new()
            .with_timeout(config.ai_request_timeout())
            .build()?;

        Ok(Self::new()
            .with(
                AiProvider::Gemini,
                Arc::new(GeminiAdapter::new(client.clone(), config.gemini_base_url())),
            )
            .with(
                AiProvider::Groq,
                Arc::new(GroqAdapter::new(client, config.groq_base_url())),
            ))
    }
}

/// Maps an error raised while sending a request or reading its body.
pub(crate) fn transport_error(provider_id: &str, err: reqwest::Error) -> ProviderError {
    if err.is_decode() {
        ProviderError::Unknown(format!("{provider_id} returned an unreadable body: {err}"))
    } else {
        ProviderError::Transport(format!("{provider_id} request failed: {err}"))
    }
}

/// Maps a non-success response to an error, reading its body for the quota markers.
pub(crate) async fn status_error(provider_id: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    classify(provider_id, status, &body)
}

fn classify(provider_id: &str, status: StatusCode, body: &str) -> ProviderError {
    let lowered = body.to_lowercase();
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    let message = format!("{provider_id} responded {status}: {body}");

    if status == StatusCode::TOO_MANY_REQUESTS
        || lowered.contains("quota")
        || lowered.contains("resource_exhausted")
        || lowered.contains("rate limit")
    {
        warn!("{provider_id} quota or rate limit reached ({status})");
        ProviderError::RateLimited(message)
    } else {
        ProviderError::Unknown(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_provider::AttemptErrorKind;

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = classify("groq", StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert_eq!(err.kind(), AttemptErrorKind::RateLimited);
    }

    #[test]
    fn quota_markers_in_body_are_rate_limited() {
        let body = r#"{"error":{"code":403,"status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            classify("gemini", StatusCode::FORBIDDEN, body).kind(),
            AttemptErrorKind::RateLimited
        );
        assert_eq!(
            classify("gemini", StatusCode::BAD_REQUEST, "Quota exceeded for metric").kind(),
            AttemptErrorKind::RateLimited
        );
    }

    #[test]
    fn other_failures_are_unknown() {
        let err = classify("gemini", StatusCode::UNAUTHORIZED, "API key not valid");
        assert_eq!(err.kind(), AttemptErrorKind::Unknown);
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn adapters_are_looked_up_by_provider() {
        let client = reqwest::Client::new();
        let adapters =
            Adapters::new().with(AiProvider::Groq, Arc::new(GroqAdapter::new(client, "http://x")));

        assert!(adapters.get(AiProvider::Groq).is_some());
        assert!(adapters.get(AiProvider::Gemini).is_none());
    }
}
