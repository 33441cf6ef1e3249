// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across Avatar crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier of a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random session identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which step of a turn a service call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CallPurpose {
    /// Naming the entities mentioned in the new input.
    Extraction,
    /// Rewriting the summary of one entity.
    Summary,
    /// Producing the reply shown to the user.
    Completion,
}

/// A single text-completion request to the language-model service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Model identifier, e.g. `gpt-3.5-turbo`.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Step of the turn this request serves. Never sent over the wire.
    pub purpose: CallPurpose,
}

impl CompletionRequest {
    /// Creates a request with no token cap.
    pub fn new(
        purpose: CallPurpose,
        model: impl Into<String>,
        temperature: f32,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature,
            max_tokens: None,
            purpose,
        }
    }
}

/// Token counts reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text.
    pub text: String,
    /// Model that actually served the request, when reported.
    #[serde(default)]
    pub model: Option<String>,
    /// Token accounting, when reported.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Creates a response carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            usage: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let id = SessionId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn call_purpose_round_trips_through_strum() {
        assert_eq!(CallPurpose::Extraction.to_string(), "extraction");
        assert_eq!(CallPurpose::from_str("summary").unwrap(), CallPurpose::Summary);
        assert!(CallPurpose::from_str("bogus").is_err());
    }

    #[test]
    fn request_constructor_leaves_token_cap_unset() {
        let req = CompletionRequest::new(CallPurpose::Completion, "gpt-3.5-turbo", 0.0, "hi");
        assert_eq!(req.max_tokens, None);
        assert_eq!(req.model, "gpt-3.5-turbo");
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("max_tokens").is_none());
    }
}
