// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model trait implemented by HTTP clients and test doubles.

use async_trait::async_trait;

use crate::error::AvatarError;
use crate::types::{CompletionRequest, CompletionResponse};

/// An opaque text-completion service.
///
/// Implementations must map transport problems and timeouts to
/// [`AvatarError::ServiceUnavailable`] and replies of the wrong shape to
/// [`AvatarError::MalformedResponse`].
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Reports missing or unusable credentials as [`AvatarError::Config`].
    fn validate_credentials(&self) -> Result<(), AvatarError> {
        Ok(())
    }

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, AvatarError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallPurpose;

    struct Echo;

    #[async_trait]
    impl LanguageModel for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, AvatarError> {
            Ok(CompletionResponse::text(request.prompt))
        }
    }

    #[tokio::test]
    async fn trait_objects_dispatch() {
        let model: Box<dyn LanguageModel> = Box::new(Echo);
        assert!(model.validate_credentials().is_ok());
        let resp = model
            .complete(CompletionRequest::new(CallPurpose::Completion, "m", 0.0, "ping"))
            .await
            .unwrap();
        assert_eq!(resp.text, "ping");
    }
}
