// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model for deterministic testing.
//!
//! `MockModel` keeps one FIFO reply queue per [`CallPurpose`]. When a queue
//! is empty a default reply is used: `NONE` for extraction, `mock summary`
//! for summaries and `mock response` for completions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use avatar_core::{AvatarError, CallPurpose, CompletionRequest, CompletionResponse, LanguageModel, TokenUsage};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Fails with [`AvatarError::ServiceUnavailable`].
    Unavailable(String),
    /// Fails with [`AvatarError::MalformedResponse`].
    Malformed(String),
    /// Sleeps, then replies with the text.
    Delayed(Duration, String),
}

/// A language model that replays scripted replies and records every request.
pub struct MockModel {
    queues: Mutex<HashMap<CallPurpose, VecDeque<MockReply>>>,
    failing: HashSet<CallPurpose>,
    requests: Mutex<Vec<CompletionRequest>>,
    has_credentials: bool,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            failing: HashSet::new(),
            requests: Mutex::new(Vec::new()),
            has_credentials: true,
        }
    }

    /// Queue a reply for `purpose`.
    pub fn push(mut self, purpose: CallPurpose, reply: MockReply) -> Self {
        self.queues
            .get_mut()
            .entry(purpose)
            .or_default()
            .push_back(reply);
        self
    }

    fn push_texts<I, S>(mut self, purpose: CallPurpose, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for text in texts {
            self = self.push(purpose, MockReply::Text(text.into()));
        }
        self
    }

    /// Raw extraction replies, e.g. `"Alice, Paris"` or `"NONE"`.
    pub fn with_extractions<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_texts(CallPurpose::Extraction, replies)
    }

    pub fn with_summaries<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_texts(CallPurpose::Summary, replies)
    }

    pub fn with_completions<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_texts(CallPurpose::Completion, replies)
    }

    /// Every call for `purpose` fails with `ServiceUnavailable`, ignoring any queue.
    pub fn failing(mut self, purpose: CallPurpose) -> Self {
        self.failing.insert(purpose);
        self
    }

    /// Makes `validate_credentials` report a missing API key.
    pub fn without_credentials(mut self) -> Self {
        self.has_credentials = false;
        self
    }

    /// Every request received, in arrival order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn requests_for(&self, purpose: CallPurpose) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.purpose == purpose)
            .cloned()
            .collect()
    }

    pub async fn call_count(&self, purpose: CallPurpose) -> usize {
        self.requests_for(purpose).await.len()
    }

    async fn next_reply(&self, purpose: CallPurpose) -> MockReply {
        if self.failing.contains(&purpose) {
            return MockReply::Unavailable(format!("mock {purpose} failure"));
        }
        self.queues
            .lock()
            .await
            .get_mut(&purpose)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| MockReply::Text(default_reply(purpose).to_string()))
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

fn default_reply(purpose: CallPurpose) -> &'static str {
    match purpose {
        CallPurpose::Extraction => "NONE",
        CallPurpose::Summary => "mock summary",
        CallPurpose::Completion => "mock response",
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn validate_credentials(&self) -> Result<(), AvatarError> {
        if self.has_credentials {
            Ok(())
        } else {
            Err(AvatarError::Config("mock model has no API key".to_string()))
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AvatarError> {
        let purpose = request.purpose;
        let model = request.model.clone();
        let reply = self.next_reply(purpose).await;
        self.requests.lock().await.push(request);

        let text = match reply {
            MockReply::Text(text) => text,
            MockReply::Unavailable(message) => return Err(AvatarError::unavailable(message)),
            MockReply::Malformed(message) => return Err(AvatarError::malformed(message)),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                text
            }
        };

        Ok(CompletionResponse {
            text,
            model: Some(model),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(purpose: CallPurpose) -> CompletionRequest {
        CompletionRequest::new(purpose, "gpt-3.5-turbo", 0.0, "prompt")
    }

    #[tokio::test]
    async fn queues_are_per_purpose() {
        let mock = MockModel::new()
            .with_extractions(["Alice"])
            .with_completions(["first", "second"]);

        assert_eq!(mock.complete(request(CallPurpose::Completion)).await.unwrap().text, "first");
        assert_eq!(mock.complete(request(CallPurpose::Extraction)).await.unwrap().text, "Alice");
        assert_eq!(mock.complete(request(CallPurpose::Completion)).await.unwrap().text, "second");
        assert_eq!(
            mock.complete(request(CallPurpose::Completion)).await.unwrap().text,
            "mock response"
        );
        assert_eq!(mock.call_count(CallPurpose::Completion).await, 3);
    }

    #[tokio::test]
    async fn failing_purpose_is_sticky() {
        let mock = MockModel::new()
            .with_summaries(["ignored"])
            .failing(CallPurpose::Summary);
        for _ in 0..2 {
            assert!(matches!(
                mock.complete(request(CallPurpose::Summary)).await,
                Err(AvatarError::ServiceUnavailable { .. })
            ));
        }
    }

    #[tokio::test]
    async fn defaults_when_queue_empty() {
        let mock = MockModel::new();
        assert_eq!(mock.complete(request(CallPurpose::Extraction)).await.unwrap().text, "NONE");
        assert_eq!(mock.complete(request(CallPurpose::Summary)).await.unwrap().text, "mock summary");
        assert!(mock.validate_credentials().is_ok());
        assert!(MockModel::new().without_credentials().validate_credentials().is_err());
    }
}
