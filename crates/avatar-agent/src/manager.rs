// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session registry exposed to the surrounding application.
//!
//! The registry lock is held only to look a session up. Each session sits
//! behind its own async mutex, which is what serializes turns within one
//! conversation while independent conversations proceed concurrently.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use avatar_config::AvatarConfig;
use avatar_core::{AvatarError, LanguageModel, SessionId};
use avatar_memory::Turn;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::guard::TimeoutModel;
use crate::session::{Session, SessionSettings};
use crate::transcript::Transcript;

/// Caller-supplied parameters for a new session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Number of recent turns kept verbatim (K). Must be at least 1.
    pub recency_window: usize,
    pub model_identifier: String,
    /// Overrides the manager's default temperature.
    pub temperature: Option<f32>,
}

impl SessionConfig {
    pub fn new(recency_window: usize, model_identifier: impl Into<String>) -> Self {
        Self {
            recency_window,
            model_identifier: model_identifier.into(),
            temperature: None,
        }
    }

    pub fn from_config(config: &AvatarConfig) -> Self {
        Self::new(config.memory.recency_window, config.openai.default_model.clone())
    }
}

/// Settings shared by every session of one manager.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub instructions: String,
    pub temperature: f32,
    pub call_timeout: Duration,
    pub summary_max_chars: Option<usize>,
    /// Model for extraction and summary calls; `None` uses the session model.
    pub extraction_model: Option<String>,
}

impl ManagerSettings {
    pub fn from_config(config: &AvatarConfig, instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            temperature: config.openai.temperature,
            call_timeout: Duration::from_secs(config.memory.call_timeout_secs),
            summary_max_chars: config.memory.summary_max_chars,
            extraction_model: config.memory.extraction_model.clone(),
        }
    }
}

/// Owns all live sessions and the archive of reset conversations.
pub struct SessionManager {
    model: Arc<dyn LanguageModel>,
    settings: ManagerSettings,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
    archive: Mutex<Vec<Transcript>>,
}

impl SessionManager {
    /// Every call made through `model` is bounded by `settings.call_timeout`.
    pub fn new(model: Arc<dyn LanguageModel>, settings: ManagerSettings) -> Self {
        let model: Arc<dyn LanguageModel> = Arc::new(TimeoutModel::new(model, settings.call_timeout));
        Self {
            model,
            settings,
            sessions: RwLock::new(HashMap::new()),
            archive: Mutex::new(Vec::new()),
        }
    }

    /// Creates an idle session with an empty buffer and store.
    pub async fn start_session(&self, config: SessionConfig) -> Result<SessionId, AvatarError> {
        let recency_window = NonZeroUsize::new(config.recency_window).ok_or_else(|| {
            AvatarError::Config("recency window must be at least 1".to_string())
        })?;
        let model = config.model_identifier.trim();
        if model.is_empty() {
            return Err(AvatarError::Config("model identifier must not be empty".to_string()));
        }
        self.model.validate_credentials()?;

        let settings = SessionSettings {
            recency_window,
            model: model.to_string(),
            extraction_model: self
                .settings
                .extraction_model
                .clone()
                .unwrap_or_else(|| model.to_string()),
            temperature: config.temperature.unwrap_or(self.settings.temperature),
            summary_max_chars: self.settings.summary_max_chars,
        };

        let id = SessionId::new();
        let session = Session::new(
            id.clone(),
            self.model.clone(),
            self.settings.instructions.clone(),
            settings,
        );
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));

        info!(
            session_id = %id,
            recency_window = recency_window.get(),
            model,
            "session started"
        );
        Ok(id)
    }

    async fn session(&self, id: &SessionId) -> Result<Arc<Mutex<Session>>, AvatarError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AvatarError::SessionNotFound { id: id.to_string() })
    }

    /// Runs one turn. A second call for the same session waits for the first.
    pub async fn submit_turn(&self, id: &SessionId, input: &str) -> Result<String, AvatarError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.submit_turn(input).await
    }

    /// Clears the session and returns its prior transcript.
    ///
    /// Non-empty transcripts are also appended to the archive.
    pub async fn reset_session(&self, id: &SessionId) -> Result<Transcript, AvatarError> {
        let session = self.session(id).await?;
        let transcript = session.lock().await.reset();
        if !transcript.is_empty() {
            self.archive.lock().await.push(transcript.clone());
        }
        Ok(transcript)
    }

    pub async fn inspect_store(&self, id: &SessionId) -> Result<BTreeMap<String, String>, AvatarError> {
        let session = self.session(id).await?;
        let entities = session.lock().await.entities();
        Ok(entities)
    }

    pub async fn inspect_buffer(&self, id: &SessionId) -> Result<Vec<Turn>, AvatarError> {
        let session = self.session(id).await?;
        let turns = session.lock().await.recent_turns();
        Ok(turns)
    }

    pub async fn inspect_transcript(&self, id: &SessionId) -> Result<Vec<Turn>, AvatarError> {
        let session = self.session(id).await?;
        let turns = session.lock().await.transcript().to_vec();
        Ok(turns)
    }

    /// Drops the session without archiving it.
    pub async fn end_session(&self, id: &SessionId) -> Result<(), AvatarError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(AvatarError::SessionNotFound { id: id.to_string() });
        }
        debug!(session_id = %id, "session ended");
        Ok(())
    }

    /// Archived conversations, oldest first.
    pub async fn archived_sessions(&self) -> Vec<Transcript> {
        self.archive.lock().await.clone()
    }

    pub async fn clear_archive(&self) {
        let mut archive = self.archive.lock().await;
        info!(cleared = archive.len(), "archive cleared");
        archive.clear();
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
