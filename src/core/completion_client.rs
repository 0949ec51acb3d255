// src/core/completion_client.rs
//! Chat-completion client: prompt in, free text out

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_log;
use crate::core::config_manager::OpenAiConfig;
use crate::error::{CoachError, Result};

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

/// Anything that can turn a prompt into model text.
///
/// Implementations report failures as `CoachError::Completion`; callers never
/// retry on their own.
#[rocket::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI-compatible chat completions over HTTPS.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CoachError::completion(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[rocket::async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        app_log!(debug, "Sending prompt to {} (model {})", url, self.model);

        let mut builder = self.client.post(&url).json(&request);
        // Without a key the API answers 401, which is reported as an auth failure.
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("Request timed out: {}", e)
            } else {
                format!("HTTP request failed: {}", e)
            };
            app_log!(error, "Completion request failed: {}", message);
            CoachError::completion(message)
        })?;

        let status = response.status();
        app_log!(trace, "Completion response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            app_log!(error, "Completion service error {}: {}", status, detail);
            return Err(CoachError::completion(format!(
                "Service returned error status {}: {}",
                status, detail
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            CoachError::completion(format!("Failed to read completion response: {}", e))
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CoachError::completion("Model returned no content"))?;

        app_log!(debug, "Raw AI response: {}", content);
        Ok(content)
    }
}
