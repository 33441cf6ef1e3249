// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Avatar conversation engine.

use thiserror::Error;

/// The primary error type used across the language-model boundary and session operations.
#[derive(Debug, Error)]
pub enum AvatarError {
    /// Invalid session or client settings (zero recency window, empty model
    /// identifier, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// The language-model service could not be reached, timed out, or rejected the request.
    #[error("service unavailable: {message}")]
    ServiceUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service replied, but not in the expected shape.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// No session is registered under the given handle.
    #[error("session not found: {id}")]
    SessionNotFound { id: String },

    /// The caller supplied input that cannot start a turn.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AvatarError {
    /// Shorthand for a [`AvatarError::ServiceUnavailable`] without an underlying cause.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`AvatarError::MalformedResponse`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// True for failures of the language-model service itself.
    ///
    /// Extraction and summary calls absorb these; everything else is a bug or
    /// a caller mistake and is propagated.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::MalformedResponse { .. }
        )
    }
}
