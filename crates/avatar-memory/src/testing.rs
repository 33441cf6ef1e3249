// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal scripted model for unit tests in this crate.

use std::collections::VecDeque;

use async_trait::async_trait;
use avatar_core::{AvatarError, CompletionRequest, CompletionResponse, LanguageModel};
use tokio::sync::Mutex;

/// Replies from a FIFO; records every request.
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, AvatarError>>>,
    pub(crate) requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub(crate) fn replying(text: &str) -> Self {
        Self::with(vec![Ok(text.to_string())])
    }

    pub(crate) fn failing(err: AvatarError) -> Self {
        Self::with(vec![Err(err)])
    }

    pub(crate) fn with(replies: Vec<Result<String, AvatarError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .await
            .last()
            .map(|r| r.prompt.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AvatarError> {
        self.requests.lock().await.push(request);
        match self.replies.lock().await.pop_front() {
            Some(reply) => reply.map(CompletionResponse::text),
            None => Err(AvatarError::Internal("script exhausted".into())),
        }
    }
}
