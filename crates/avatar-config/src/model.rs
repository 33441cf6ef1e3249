// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Avatar.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Avatar configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AvatarConfig {
    /// Assistant identity and prompt settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// OpenAI-compatible API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Conversation memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl AvatarConfig {
    /// Renders the configuration as TOML with the API key masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut copy = self.clone();
        if copy.openai.api_key.is_some() {
            copy.openai.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&copy)
    }
}

/// Assistant identity and prompt configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant, used in the default instructions.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline instructions placed at the top of every conversation prompt.
    /// Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a text file containing the instructions.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "avatar".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI-compatible API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without a trailing endpoint path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used when a session does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature for every call.
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries after a transient failure. Zero disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    /// Pause between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

/// Conversation memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Number of recent turns kept verbatim in every prompt (K).
    #[serde(default = "default_recency_window")]
    pub recency_window: usize,

    /// Optional cap on entity summary length, in characters.
    #[serde(default)]
    pub summary_max_chars: Option<usize>,

    /// Upper bound on each language-model call made during a turn, in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Model used for extraction and summaries. Defaults to the session model.
    #[serde(default)]
    pub extraction_model: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            recency_window: default_recency_window(),
            summary_max_chars: None,
            call_timeout_secs: default_call_timeout_secs(),
            extraction_model: None,
        }
    }
}

fn default_recency_window() -> usize {
    3
}

fn default_call_timeout_secs() -> u64 {
    90
}
