use super::types::{
    ChatCompletionResponse, ChatMessageContent, Completion, CompletionRequest, ErrorEnvelope,
};
use super::CompletionService;
use crate::models::{Config, DEFAULT_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub const NO_CODE_MESSAGE: &str = "Could not generate code. Please check your input.";
pub const MISSING_KEY_MESSAGE: &str = "Unauthorized: no API key configured";

/// HTTP client for the chat completions endpoint.
///
/// Makes exactly one attempt per request and sets no client-side timeout.
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone()).with_base_url(config.base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn error_from_status(status: reqwest::StatusCode, body: &str) -> Error {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Error::Service(envelope.error.message),
            Err(_) => Error::Service(format!(
                "Request failed with status {}",
                status.as_u16()
            )),
        }
    }

    fn completion_from_body(body: &str) -> Result<Completion> {
        let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            tracing::error!("Failed to parse completion response: {}\nBody: {}", e, body);
            Error::Service(NO_CODE_MESSAGE.to_string())
        })?;

        let candidates: Vec<String> = response
            .choices
            .into_iter()
            .filter_map(|choice| match choice.message.content {
                Some(ChatMessageContent::Text(text)) => Some(text),
                _ => None,
            })
            .collect();

        if candidates.is_empty() {
            tracing::error!("Completion response carried no usable choices");
            return Err(Error::Service(NO_CODE_MESSAGE.to_string()));
        }

        Ok(Completion { candidates })
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn send(&self, request: &CompletionRequest) -> Result<Completion> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("No API key configured; refusing to contact completion service");
            return Err(Error::Service(MISSING_KEY_MESSAGE.to_string()));
        };

        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        tracing::debug!(
            "Sending completion request to {} (model: {})",
            url,
            request.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to completion service: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Completion service error (status {}): {}", status, body);
            return Err(Self::error_from_status(status, &body));
        }

        Self::completion_from_body(&body)
    }
}
