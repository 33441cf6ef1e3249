// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-based entity extraction from the latest user input.
//!
//! The model is shown the recent turns for reference and asked to list the
//! named entities in the newest human line as a comma-separated list, or
//! `NONE`.

use std::sync::Arc;

use avatar_core::{AvatarError, CallPurpose, CompletionRequest, LanguageModel};
use tracing::debug;

use crate::prompt::fill_template;
use crate::types::{Turn, render_turns};

/// Names longer than this mean the model answered in prose.
pub const MAX_ENTITY_NAME_CHARS: usize = 80;

/// Reply that stands for "no entities".
pub const NO_ENTITIES: &str = "NONE";

const EXTRACTION_MAX_TOKENS: u32 = 128;

const EXTRACTION_PROMPT: &str = r#"You read a conversation between a human and an AI and pick out the named entities in the human's last line.

Only list proper nouns: people, places, organisations, products and other named things. Use the history only to work out what pronouns and references in the last line point to. Do not list entities that appear only in the history.

Return one comma-separated list of names. If the last line names nothing, return NONE.

EXAMPLE
History:
Human: I just got back from Lisbon with Marta.
AI: Welcome back! How was the trip?
Last line:
Human: She loved the tram rides there.
Output: Marta, Lisbon
END OF EXAMPLE

History:
{history}
Last line:
Human: {input}
Output:"#;

/// Asks the language model which entities the new input mentions.
pub struct EntityExtractor {
    model: Arc<dyn LanguageModel>,
    model_id: String,
    temperature: f32,
}

impl EntityExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, model_id: impl Into<String>, temperature: f32) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            temperature,
        }
    }

    /// Returns the deduplicated entity names in `input`, in first-seen order.
    pub async fn extract(&self, recent_turns: &[Turn], input: &str) -> Result<Vec<String>, AvatarError> {
        let mut request = CompletionRequest::new(
            CallPurpose::Extraction,
            self.model_id.clone(),
            self.temperature,
            build_extraction_prompt(recent_turns, input),
        );
        request.max_tokens = Some(EXTRACTION_MAX_TOKENS);

        let response = self.model.complete(request).await?;
        let names = parse_entity_list(&response.text)?;
        debug!(entities = ?names, "entities extracted");
        Ok(names)
    }
}

/// Fill the extraction template with rendered history and the new input.
pub fn build_extraction_prompt(recent_turns: &[Turn], input: &str) -> String {
    let history = render_turns(recent_turns);
    let history = if history.is_empty() {
        "(no earlier turns)"
    } else {
        history.trim_end()
    };
    fill_template(EXTRACTION_PROMPT, &[("history", history), ("input", input)])
}

/// Parse a comma- or newline-separated entity list.
///
/// Tolerates an echoed `Output:` label, list bullets, quotes and a trailing
/// period. `NONE` or an empty reply yields no entities.
pub fn parse_entity_list(text: &str) -> Result<Vec<String>, AvatarError> {
    let mut body = text.trim();
    if body
        .get(..7)
        .is_some_and(|label| label.eq_ignore_ascii_case("output:"))
    {
        body = body[7..].trim();
    }

    if body.is_empty() || body.eq_ignore_ascii_case(NO_ENTITIES) {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = Vec::new();
    for raw in body.split([',', '\n']) {
        let name = raw
            .trim()
            .trim_start_matches(['-', '*'])
            .trim()
            .trim_end_matches('.')
            .trim_matches(['"', '\'', '`'])
            .trim();

        if name.is_empty() || name.eq_ignore_ascii_case(NO_ENTITIES) {
            continue;
        }
        if name.chars().count() > MAX_ENTITY_NAME_CHARS {
            return Err(AvatarError::malformed(format!(
                "extraction reply is not an entity list: {}",
                truncate_for_log(body)
            )));
        }
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

fn truncate_for_log(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
