// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call deadline around a language model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use avatar_core::{AvatarError, CompletionRequest, CompletionResponse, LanguageModel};
use tracing::warn;

/// Wraps a model so every call fails with [`AvatarError::ServiceUnavailable`]
/// once `timeout` elapses.
pub struct TimeoutModel {
    inner: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl TimeoutModel {
    pub fn new(inner: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl LanguageModel for TimeoutModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn validate_credentials(&self) -> Result<(), AvatarError> {
        self.inner.validate_credentials()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AvatarError> {
        let purpose = request.purpose;
        match tokio::time::timeout(self.timeout, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(
                    %purpose,
                    model = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "language model call timed out"
                );
                Err(AvatarError::unavailable(format!(
                    "{purpose} call timed out after {}s",
                    self.timeout.as_secs_f32()
                )))
            }
        }
    }
}
