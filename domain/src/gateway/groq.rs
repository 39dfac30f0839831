//! Groq client for the OpenAI-compatible chat completions endpoint.

use super::{status_error, transport_error};
use ai_auth::api_key::{BearerTokenAuth, ProviderAuth};
use ai_provider::{Error, Provider, Request};
use async_trait::async_trait;
use log::*;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'static str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_request(request: &'a Request) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_instruction.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &request.prompt,
        });

        Self {
            model: MODEL,
            messages,
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 1.0,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Groq adapter. One instance serves every Groq key; the key is supplied per call.
pub struct GroqAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GroqAdapter {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Provider for GroqAdapter {
    async fn generate(&self, secret: &SecretString, request: &Request) -> Result<String, Error> {
        let auth = BearerTokenAuth::new(secret.clone());
        let url = format!("{}/openai/v1/chat/completions", self.base_url);

        debug!("Sending {} request to {MODEL}", self.provider_id());

        let response = auth
            .authenticate(self.client.post(&url))
            .json(&ChatCompletionRequest::from_request(request))
            .send()
            .await
            .map_err(|e| transport_error(self.provider_id(), e))?;

        if !response.status().is_success() {
            return Err(status_error(self.provider_id(), response).await);
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| transport_error(self.provider_id(), e))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Empty("Groq returned no completion content".to_string()))
    }

    fn provider_id(&self) -> &str {
        "groq"
    }
}
