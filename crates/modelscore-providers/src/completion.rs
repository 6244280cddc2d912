//! OpenAI-style chat-completion adapter used for qualitative judgments.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use modelscore_core::{CompletionService, UpstreamError, UpstreamResult};

use crate::config::{ProviderConfig, COMPLETION_API_KEY_VAR};
use crate::http_error;

const SERVICE: &str = "completion";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a hosted `/chat/completions` endpoint.
pub struct ChatCompletionClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ChatCompletionClient {
    pub fn new(config: &ProviderConfig) -> UpstreamResult<Self> {
        Ok(Self {
            client: config.http_client()?,
            url: config.completion_url.clone(),
            model: config.completion_model.clone(),
            api_key: config.completion_api_key.clone(),
            timeout: config.completion_timeout,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, api_key: &str, prompt: &str) -> UpstreamResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| http_error(SERVICE, e))?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }
        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::malformed(SERVICE, "reply has no message content"))
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> UpstreamResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredential {
                variable: COMPLETION_API_KEY_VAR,
            })?;
        debug!(prompt_chars = prompt.len(), "requesting completion");
        tokio::time::timeout(self.timeout, self.send(api_key, prompt))
            .await
            .map_err(|_| UpstreamError::Timeout {
                service: SERVICE,
                after_ms: self.timeout.as_millis() as u64,
            })?
    }
}
