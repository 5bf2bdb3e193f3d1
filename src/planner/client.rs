//! DeepSeek chat-completion client
//!
//! Sends the planning prompt to `{base_url}/v1/chat/completions` and turns
//! the model's text answer into JSON. A single attempt is made per request.

use super::extract::extract_json;
use super::prompts::{sprint_plan_prompt, SYSTEM_PROMPT};
use super::PlanRequestor;
use crate::config::{AiConfig, DeepSeekConfig};
use crate::error::RemoteError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Plan requestor backed by the DeepSeek API
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    client: reqwest::Client,
    deepseek: DeepSeekConfig,
    ai: AiConfig,
}

impl DeepSeekClient {
    /// Build a client from configuration
    pub fn new(deepseek: DeepSeekConfig, ai: AiConfig) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = ai.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            deepseek,
            ai,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.deepseek.base_url.trim_end_matches('/')
        )
    }

    /// Send one chat completion and return the assistant's text
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        let request = ChatRequest {
            model: &self.deepseek.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.ai.temperature,
            max_tokens: self.ai.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.deepseek.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                RemoteError::MalformedResponse("response has no choices[0].message.content".to_string())
            })
    }
}

/// Map a non-success HTTP status to a remote error
pub fn classify_status(status: StatusCode, body: String) -> RemoteError {
    match status {
        StatusCode::PAYMENT_REQUIRED => RemoteError::InsufficientCredits,
        StatusCode::UNAUTHORIZED => RemoteError::InvalidCredentials,
        _ => RemoteError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl PlanRequestor for DeepSeekClient {
    async fn request_plan(&self, document: &Value) -> Result<Value, RemoteError> {
        if self.deepseek.api_key.trim().is_empty() {
            return Err(RemoteError::MissingApiKey);
        }

        let prompt = sprint_plan_prompt(document);
        tracing::info!(
            model = %self.deepseek.model,
            stories = document["stories"].as_array().map_or(0, Vec::len),
            "requesting sprint plan from DeepSeek"
        );

        let content = self.complete(&prompt).await?;
        tracing::debug!(chars = content.len(), "received completion");

        extract_json(&content)
    }
}
