/// Suggestion generator
///
/// Turns a piece of user-facing text into model-generated output through one
/// of four prompt templates. Each call is a single synchronous request; a
/// parsing failure on structured output is fatal for that request.
use crate::{
    error::{DeskError, DeskResult},
    providers::llm::LlmClient,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_SUGGESTION_PROMPT: &str = "You are the owner of the business responding to those reviews in the corresponding language. I want three answers: one formal labeled 'formal', one more friendly labeled 'friendly', and one with emojis labeled 'emoji'. Provide your answers in JSON format";

const PREFERENCE_REPLY_PROMPT: &str = "You are the owner of the business responding to those reviews in the corresponding language. I want an answer generated respecting these preferences: ";

const COMMENT_REPLY_PROMPT: &str = "You are the community manager of the business. Answer in a friendly tone. This is the caption of your post, for context: ";

const CAPTION_PROMPT: &str = "You are a community manager. You will create a caption for a social media post about the new product from the keywords the user gives you. The answer must be formal and without emojis, but trending hashtags are welcome. The user's business is a restaurant.";

/// Three-tone reply suggestions for a review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySuggestions {
    pub formal: String,
    pub friendly: String,
    pub emoji: String,
}

/// Parse the model's structured three-tone output
///
/// Missing keys default to empty strings; non-JSON content is a
/// Generation error.
pub fn parse_reply_suggestions(content: &str) -> DeskResult<ReplySuggestions> {
    let parsed: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| DeskError::Generation(format!("suggestions are not valid JSON: {}", e)))?;

    let field = |key: &str| -> String {
        parsed
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Ok(ReplySuggestions {
        formal: field("formal"),
        friendly: field("friendly"),
        emoji: field("emoji"),
    })
}

/// Suggestion generator over the language-model client
#[derive(Clone)]
pub struct SuggestionGenerator {
    llm: Arc<LlmClient>,
}

impl SuggestionGenerator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// Default three-tone reply suggestions for a review
    pub async fn default_suggestions(&self, review: &str) -> DeskResult<ReplySuggestions> {
        let content = self
            .llm
            .chat(self.llm.suggestion_model(), DEFAULT_SUGGESTION_PROMPT, review)
            .await?;

        parse_reply_suggestions(&content)
    }

    /// Review reply guided by the owner's stored preferences
    pub async fn review_reply(&self, review: &str, preferences: &str) -> DeskResult<String> {
        let system = format!("{}{}", PREFERENCE_REPLY_PROMPT, preferences);
        self.llm.chat(self.llm.reply_model(), &system, review).await
    }

    /// Comment reply with the post caption as context
    pub async fn comment_reply(&self, comment: &str, caption: &str) -> DeskResult<String> {
        let system = format!("{}{}", COMMENT_REPLY_PROMPT, caption);
        self.llm.chat(self.llm.reply_model(), &system, comment).await
    }

    /// Caption for a post, generated from keywords
    ///
    /// An empty keyword set still goes to the model; it produces a generic
    /// caption rather than failing.
    pub async fn caption(&self, keywords: &str) -> DeskResult<String> {
        self.llm
            .chat(self.llm.caption_model(), CAPTION_PROMPT, keywords)
            .await
    }
}
