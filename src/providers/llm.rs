/// Language-model provider client (OpenAI-compatible chat completions)
///
/// Single synchronous request per call; no streaming, no retry, no caching
/// of repeated identical inputs.
use crate::{
    config::LlmProviderConfig,
    error::{DeskError, DeskResult},
    providers::{build_http_client, decode_json, transport_error},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Language-model provider client
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmProviderConfig,
}

impl LlmClient {
    pub fn new(config: LlmProviderConfig) -> DeskResult<Self> {
        Ok(Self {
            http: build_http_client()?,
            config,
        })
    }

    pub fn suggestion_model(&self) -> &str {
        &self.config.suggestion_model
    }

    pub fn reply_model(&self) -> &str {
        &self.config.reply_model
    }

    pub fn caption_model(&self) -> &str {
        &self.config.caption_model
    }

    /// Send a fixed system prompt plus caller-supplied text, return the
    /// model's message content
    pub async fn chat(&self, model: &str, system: &str, user: &str) -> DeskResult<String> {
        let url = format!("{}/chat/completions", self.config.api_url);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("Chat completion failed", e))?;

        let decoded: ChatResponse = decode_json(response).await?;
        let choice = decoded
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DeskError::Generation("model returned no choices".to_string()))?;

        Ok(choice.message.content)
    }
}
