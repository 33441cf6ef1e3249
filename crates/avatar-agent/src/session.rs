// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation state machine and the per-turn memory algorithm.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use avatar_core::{AvatarError, CallPurpose, CompletionRequest, LanguageModel, SessionId};
use avatar_memory::{
    EntityEntry, EntityExtractor, EntityStore, PromptAssembler, SummaryUpdater, Turn, TurnBuffer,
    TurnContext,
};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::transcript::Transcript;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for user input.
    Idle,
    /// A turn is in flight.
    Processing,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Processing => write!(f, "processing"),
        }
    }
}

/// Per-session knobs resolved by the manager.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub recency_window: NonZeroUsize,
    /// Model for the main completion.
    pub model: String,
    /// Model for extraction and summary calls.
    pub extraction_model: String,
    pub temperature: f32,
    pub summary_max_chars: Option<usize>,
}

/// One conversation: recent turns, entity memory, and the full transcript.
pub struct Session {
    id: SessionId,
    state: SessionState,
    buffer: TurnBuffer,
    store: EntityStore,
    transcript: Vec<Turn>,
    extractor: EntityExtractor,
    summarizer: SummaryUpdater,
    assembler: PromptAssembler,
    model: Arc<dyn LanguageModel>,
    settings: SessionSettings,
}

impl Session {
    pub fn new(
        id: SessionId,
        model: Arc<dyn LanguageModel>,
        instructions: impl Into<String>,
        settings: SessionSettings,
    ) -> Self {
        let extractor = EntityExtractor::new(
            model.clone(),
            settings.extraction_model.clone(),
            settings.temperature,
        );
        let summarizer = SummaryUpdater::new(
            model.clone(),
            settings.extraction_model.clone(),
            settings.temperature,
        )
        .with_max_chars(settings.summary_max_chars);

        Self {
            id,
            state: SessionState::Idle,
            buffer: TurnBuffer::new(settings.recency_window),
            store: EntityStore::new(),
            transcript: Vec::new(),
            extractor,
            summarizer,
            assembler: PromptAssembler::new(instructions),
            model,
            settings,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Snapshot of every entity summary, ordered by name.
    pub fn entities(&self) -> BTreeMap<String, String> {
        self.store.all()
    }

    /// Snapshot of the recency window, oldest first.
    pub fn recent_turns(&self) -> Vec<Turn> {
        self.buffer.contents()
    }

    /// Every completed turn since the last reset.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Runs one conversation turn and returns the assistant's reply.
    ///
    /// Only a failure of the main completion is returned; the session is left
    /// exactly as it was in that case.
    pub async fn submit_turn(&mut self, input: &str) -> Result<String, AvatarError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AvatarError::InvalidInput("input is empty".to_string()));
        }

        if self.state == SessionState::Processing {
            warn!(session_id = %self.id, "previous turn did not finish cleanly");
        }
        self.state = SessionState::Processing;
        let result = self.run_turn(input).await;
        self.state = SessionState::Idle;
        result
    }

    async fn run_turn(&mut self, input: &str) -> Result<String, AvatarError> {
        let recent = self.buffer.contents();

        let entities = match self.extractor.extract(&recent, input).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "entity extraction failed, continuing without entities");
                Vec::new()
            }
        };
        debug!(session_id = %self.id, ?entities, "entities extracted");

        let relevant: Vec<EntityEntry> = entities
            .iter()
            .filter_map(|name| self.store.get(name))
            .collect();

        let prompt = self.assembler.assemble(&recent, &relevant, input);
        let request = CompletionRequest::new(
            CallPurpose::Completion,
            self.settings.model.clone(),
            self.settings.temperature,
            prompt,
        );
        let output = match self.model.complete(request).await {
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "completion failed, turn discarded");
                return Err(e);
            }
        };

        let turn_context = TurnContext {
            recent_turns: &recent,
            input,
            output: &output,
        };
        let summarizer = &self.summarizer;
        let store = &self.store;
        let updates = join_all(entities.iter().map(|name| {
            let prior = store.get(name).map(|entry| entry.summary);
            async move {
                summarizer
                    .update(name, prior.as_deref(), turn_context)
                    .await
            }
        }))
        .await;

        for (name, update) in entities.iter().zip(updates) {
            match update {
                Ok(summary) => self.store.put(name.as_str(), summary),
                Err(e) => {
                    warn!(session_id = %self.id, entity = %name, error = %e, "summary update failed, keeping prior summary");
                }
            }
        }

        let turn = Turn::new(input, output.as_str());
        self.buffer.append(turn.clone());
        self.transcript.push(turn);

        info!(
            session_id = %self.id,
            entities = entities.len(),
            known_entities = self.store.len(),
            turns = self.transcript.len(),
            "turn complete"
        );
        Ok(output)
    }

    /// Clears buffer, store and transcript, returning the prior transcript.
    pub fn reset(&mut self) -> Transcript {
        let turns = std::mem::take(&mut self.transcript);
        self.buffer.clear();
        self.store.clear();
        self.state = SessionState::Idle;
        info!(session_id = %self.id, turns = turns.len(), "session reset");
        Transcript::capture(self.id.clone(), turns)
    }
}
