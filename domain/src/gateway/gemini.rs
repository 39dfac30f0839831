//! Google Gemini `generateContent` client.

use super::{status_error, transport_error};
use ai_auth::api_key::{ApiKeyAuth, ProviderAuth};
use ai_provider::{Error, Provider, Request};
use async_trait::async_trait;
use log::*;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const MODEL: &str = "gemini-2.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    candidate_count: u32,
    max_output_tokens: u32,
    temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            candidate_count: 1,
            max_output_tokens: 2048,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(rename = "system_instruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a Request) -> Self {
        Self {
            system_instruction: request.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    // Text of the first candidate, with its parts joined.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        if let Some(reason) = &candidate.finish_reason {
            debug!("Gemini finish reason: {reason}");
        }

        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        Some(text)
    }
}

/// Gemini adapter. One instance serves every Gemini key; the key is supplied per call.
pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url)
    }
}

#[async_trait]
impl Provider for GeminiAdapter {
    async fn generate(&self, secret: &SecretString, request: &Request) -> Result<String, Error> {
        let auth = ApiKeyAuth::new(secret.clone(), API_KEY_HEADER, None);
        let body = GenerateContentRequest::from_request(request);

        debug!("Sending {} request to {MODEL}", self.provider_id());

        let response = auth
            .authenticate(self.client.post(self.url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(self.provider_id(), e))?;

        if !response.status().is_success() {
            return Err(status_error(self.provider_id(), response).await);
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| transport_error(self.provider_id(), e))?;

        match payload.into_text() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(Error::Empty("Gemini returned no candidate text".to_string())),
        }
    }

    fn provider_id(&self) -> &str {
        "gemini"
    }
}
