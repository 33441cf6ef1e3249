// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling per-entity summaries.
//!
//! Each mention of an entity rewrites its summary from the prior summary and
//! the latest exchange. Summaries are replaced, never concatenated.

use std::sync::Arc;

use avatar_core::{AvatarError, CallPurpose, CompletionRequest, LanguageModel};
use tracing::debug;

use crate::prompt::fill_template;
use crate::types::{AI_PREFIX, HUMAN_PREFIX, TurnContext, render_turns, single_line};

/// Stands in for the summary of an entity seen for the first time.
pub const NO_PRIOR_KNOWLEDGE: &str = "(no prior knowledge)";

const SUMMARY_MAX_TOKENS: u32 = 256;

const SUMMARY_PROMPT: &str = r#"You keep a short knowledge-base entry about one entity mentioned in a conversation between a human and an AI.

Rewrite the existing summary of "{entity}" so it also covers anything new the last exchange says about it. Keep facts that are still true, drop facts the conversation contradicts, and stay within a few sentences. If the last exchange adds nothing about "{entity}", return the existing summary unchanged.

History:
{history}

Existing summary of {entity}:
{summary}

Last exchange:
{human}: {input}
{ai}: {output}

Updated summary:"#;

/// Asks the language model for an entity's updated summary.
pub struct SummaryUpdater {
    model: Arc<dyn LanguageModel>,
    model_id: String,
    temperature: f32,
    max_chars: Option<usize>,
}

impl SummaryUpdater {
    pub fn new(model: Arc<dyn LanguageModel>, model_id: impl Into<String>, temperature: f32) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            temperature,
            max_chars: None,
        }
    }

    /// Caps every produced summary at `max_chars` characters.
    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Produce the new summary for `name`.
    ///
    /// The reply is folded onto one line before the cap applies. An empty reply
    /// is a [`AvatarError::MalformedResponse`]; the caller keeps the prior
    /// summary in that case.
    pub async fn update(
        &self,
        name: &str,
        prior_summary: Option<&str>,
        turn: TurnContext<'_>,
    ) -> Result<String, AvatarError> {
        let mut request = CompletionRequest::new(
            CallPurpose::Summary,
            self.model_id.clone(),
            self.temperature,
            build_summary_prompt(name, prior_summary, turn),
        );
        request.max_tokens = Some(SUMMARY_MAX_TOKENS);

        let response = self.model.complete(request).await?;
        let summary = single_line(&response.text);
        if summary.is_empty() {
            return Err(AvatarError::malformed(format!(
                "empty summary returned for entity `{name}`"
            )));
        }

        let summary = match self.max_chars {
            Some(limit) => truncate_chars(&summary, limit),
            None => summary,
        };
        debug!(entity = name, chars = summary.chars().count(), "summary updated");
        Ok(summary)
    }
}

/// Fill the summary template for one entity.
pub fn build_summary_prompt(name: &str, prior_summary: Option<&str>, turn: TurnContext<'_>) -> String {
    let history = render_turns(turn.recent_turns);
    let history = if history.is_empty() {
        "(no earlier turns)"
    } else {
        history.trim_end()
    };
    let summary = prior_summary
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_PRIOR_KNOWLEDGE);

    fill_template(
        SUMMARY_PROMPT,
        &[
            ("entity", name),
            ("history", history),
            ("summary", summary),
            ("human", HUMAN_PREFIX),
            ("ai", AI_PREFIX),
            ("input", turn.input),
            ("output", turn.output),
        ],
    )
}

/// Keeps at most `limit` characters, cutting on a char boundary.
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
