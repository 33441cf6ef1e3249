// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`SessionManager`] over a [`MockModel`] and opens
//! one session, so tests can drive whole turns with `send()`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use avatar_agent::{ManagerSettings, SessionConfig, SessionManager};
use avatar_core::{AvatarError, SessionId};
use avatar_memory::Turn;

use crate::mock_model::MockModel;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    model: MockModel,
    recency_window: usize,
    summary_max_chars: Option<usize>,
    call_timeout: Duration,
    instructions: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            model: MockModel::new(),
            recency_window: 3,
            summary_max_chars: None,
            call_timeout: Duration::from_secs(30),
            instructions: "You are a helpful test assistant.".to_string(),
        }
    }

    pub fn with_model(mut self, model: MockModel) -> Self {
        self.model = model;
        self
    }

    pub fn recency_window(mut self, k: usize) -> Self {
        self.recency_window = k;
        self
    }

    pub fn summary_max_chars(mut self, max: usize) -> Self {
        self.summary_max_chars = Some(max);
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Build the manager and start one session.
    ///
    /// Fails with whatever `start_session` rejects (zero window, missing
    /// credentials).
    pub async fn build(self) -> Result<TestHarness, AvatarError> {
        let model = Arc::new(self.model);
        let manager = SessionManager::new(
            model.clone(),
            ManagerSettings {
                instructions: self.instructions,
                temperature: 0.0,
                call_timeout: self.call_timeout,
                summary_max_chars: self.summary_max_chars,
                extraction_model: None,
            },
        );
        let session = manager
            .start_session(SessionConfig::new(self.recency_window, "gpt-3.5-turbo"))
            .await?;

        Ok(TestHarness {
            manager,
            model,
            session,
        })
    }
}

/// A session manager over a mock model with one open session.
pub struct TestHarness {
    pub manager: SessionManager,
    pub model: Arc<MockModel>,
    pub session: SessionId,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Submit one turn on the harness session.
    pub async fn send(&self, input: &str) -> Result<String, AvatarError> {
        self.manager.submit_turn(&self.session, input).await
    }

    pub async fn store(&self) -> BTreeMap<String, String> {
        self.manager
            .inspect_store(&self.session)
            .await
            .unwrap_or_default()
    }

    pub async fn buffer(&self) -> Vec<Turn> {
        self.manager
            .inspect_buffer(&self.session)
            .await
            .unwrap_or_default()
    }
}
