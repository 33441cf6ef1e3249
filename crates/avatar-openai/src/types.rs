// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat and legacy completion request/response types.
//!
//! Response types accept missing fields. `into_completion` checks the shape
//! and reports a missing choice or content as
//! [`AvatarError::MalformedResponse`].

use avatar_core::{AvatarError, CompletionResponse, TokenUsage};
use serde::{Deserialize, Serialize};

/// Which endpoint a model is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStyle {
    /// `POST /chat/completions`
    Chat,
    /// `POST /completions`
    Legacy,
}

impl ApiStyle {
    /// Legacy completion models are recognised by name; everything else is chat.
    pub fn for_model(model: &str) -> Self {
        const LEGACY_PREFIXES: &[&str] = &[
            "text-", "code-", "davinci", "curie", "babbage", "ada",
        ];
        if model.contains("-instruct") || LEGACY_PREFIXES.iter().any(|p| model.starts_with(p)) {
            Self::Legacy
        } else {
            Self::Chat
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Chat => "chat/completions",
            Self::Legacy => "completions",
        }
    }
}

// --- Request types ---

/// A request to the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

/// A request to the legacy completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TextRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

// --- Response types ---

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl From<ApiUsage> for TokenUsage {
    fn from(usage: ApiUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }
    }
}

/// Response from the chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Validate the shape and take the first choice's content.
    pub fn into_completion(self) -> Result<CompletionResponse, AvatarError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AvatarError::malformed("chat response has no choices"))?;
        let text = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| AvatarError::malformed("chat response choice has no content"))?;
        Ok(CompletionResponse {
            text,
            model: self.model,
            usage: self.usage.map(Into::into),
        })
    }
}

/// Response from the legacy completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TextResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<TextChoice>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextChoice {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl TextResponse {
    /// Validate the shape and take the first choice's text.
    pub fn into_completion(self) -> Result<CompletionResponse, AvatarError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AvatarError::malformed("completion response has no choices"))?
            .text
            .ok_or_else(|| AvatarError::malformed("completion response choice has no text"))?;
        Ok(CompletionResponse {
            text,
            model: self.model,
            usage: self.usage.map(Into::into),
        })
    }
}

/// OpenAI error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
