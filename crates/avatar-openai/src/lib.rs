// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible implementation of [`LanguageModel`].
//!
//! Chat models are called through `/chat/completions` with the whole prompt
//! as a single user message; legacy completion models (`text-davinci-003`
//! and friends) through `/completions`.

pub mod client;
pub mod types;

use async_trait::async_trait;
use avatar_config::model::OpenAiConfig;
use avatar_core::{AvatarError, CompletionRequest, CompletionResponse, LanguageModel};
use secrecy::SecretString;
use tracing::{debug, info};

pub use client::{ClientSettings, OpenAiClient};
use types::{ApiStyle, ChatMessage, ChatRequest, ChatResponse, TextRequest, TextResponse};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI language model.
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> none.
/// A model without a key can be constructed but fails
/// [`LanguageModel::validate_credentials`].
pub struct OpenAiModel {
    client: OpenAiClient,
    has_api_key: bool,
    default_max_tokens: u32,
}

impl OpenAiModel {
    /// Creates a model from the `[openai]` config section.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, AvatarError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), std::env::var(API_KEY_ENV).ok());
        let model = Self::new(
            api_key,
            ClientSettings::from_config(config),
            config.max_tokens,
        )?;
        info!(
            base_url = model.client.base_url(),
            model = %config.default_model,
            credentials = model.has_api_key,
            "OpenAI model initialized"
        );
        Ok(model)
    }

    pub fn new(
        api_key: Option<SecretString>,
        settings: ClientSettings,
        default_max_tokens: u32,
    ) -> Result<Self, AvatarError> {
        let client = OpenAiClient::new(api_key.as_ref(), settings)?;
        Ok(Self {
            client,
            has_api_key: api_key.is_some(),
            default_max_tokens,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    fn validate_credentials(&self) -> Result<(), AvatarError> {
        if self.has_api_key {
            Ok(())
        } else {
            Err(AvatarError::Config(format!(
                "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
            )))
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AvatarError> {
        let style = ApiStyle::for_model(&request.model);
        let max_tokens = Some(request.max_tokens.unwrap_or(self.default_max_tokens));
        debug!(
            purpose = %request.purpose,
            model = %request.model,
            ?style,
            prompt_chars = request.prompt.len(),
            "sending completion request"
        );

        let response = match style {
            ApiStyle::Chat => {
                let body = ChatRequest {
                    model: request.model,
                    messages: vec![ChatMessage::user(request.prompt)],
                    temperature: request.temperature,
                    max_tokens,
                };
                self.client
                    .post_json::<_, ChatResponse>(style.endpoint(), &body)
                    .await?
                    .into_completion()?
            }
            ApiStyle::Legacy => {
                let body = TextRequest {
                    model: request.model,
                    prompt: request.prompt,
                    temperature: request.temperature,
                    max_tokens,
                };
                self.client
                    .post_json::<_, TextResponse>(style.endpoint(), &body)
                    .await?
                    .into_completion()?
            }
        };

        if let Some(usage) = &response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "completion usage"
            );
        }
        Ok(response)
    }
}

/// Picks the configured key if non-empty, else the environment value.
fn resolve_api_key(config_key: Option<&str>, env_key: Option<String>) -> Option<SecretString> {
    config_key
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or_else(|| env_key.filter(|k| !k.trim().is_empty()))
        .map(SecretString::from)
}
