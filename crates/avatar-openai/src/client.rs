// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible completion APIs.
//!
//! Provides [`OpenAiClient`] which handles bearer authentication, request
//! timeouts, status mapping, and opt-in retry of transient failures.

use std::time::Duration;

use avatar_core::AvatarError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::ApiErrorResponse;

/// Transport settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Retries after a transient failure. Zero sends each request once.
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl ClientSettings {
    pub fn from_config(config: &avatar_config::model::OpenAiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// HTTP client for OpenAI API communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl OpenAiClient {
    /// Creates a client. Without an API key no `Authorization` header is sent.
    pub fn new(api_key: Option<&SecretString>, settings: ClientSettings) -> Result<Self, AvatarError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|e| AvatarError::Config(format!("invalid API key header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| AvatarError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
            retry_backoff: settings.retry_backoff,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` to `{base_url}/{endpoint}` and decodes the JSON reply.
    ///
    /// Transient failures (connection errors, timeouts, 429 and 5xx gateway
    /// statuses) are retried up to `max_retries` times.
    pub async fn post_json<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp, AvatarError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                tokio::time::sleep(self.retry_backoff).await;
            }

            match self.send_once(&url, body).await {
                Ok(text) => {
                    return serde_json::from_str(&text).map_err(|e| {
                        AvatarError::malformed(format!("failed to parse API response: {e}"))
                    });
                }
                Err(Failure::Transient(err)) if attempt < self.max_retries => {
                    warn!(attempt, url = %url, error = %err, "transient error, will retry");
                    attempt += 1;
                }
                Err(Failure::Transient(err) | Failure::Fatal(err)) => return Err(err),
            }
        }
    }

    async fn send_once<Req>(&self, url: &str, body: &Req) -> Result<String, Failure>
    where
        Req: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let transient = e.is_connect() || e.is_timeout();
                let message = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    format!("HTTP request failed: {e}")
                };
                let err = AvatarError::ServiceUnavailable {
                    message,
                    source: Some(Box::new(e)),
                };
                if transient {
                    Failure::Transient(err)
                } else {
                    Failure::Fatal(err)
                }
            })?;

        let status = response.status();
        debug!(status = %status, url, "response received");

        let text = response.text().await.map_err(|e| {
            Failure::Transient(AvatarError::ServiceUnavailable {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })
        })?;

        if status.is_success() {
            return Ok(text);
        }

        let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(api_err) => format!(
                "OpenAI API error ({}): {}",
                api_err.error.type_.as_deref().unwrap_or("unknown"),
                api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {text}"),
        };
        let err = AvatarError::unavailable(message);

        if is_transient_status(status) {
            Err(Failure::Transient(err))
        } else {
            Err(Failure::Fatal(err))
        }
    }
}

enum Failure {
    Transient(AvatarError),
    Fatal(AvatarError),
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str, max_retries: u32) -> ClientSettings {
        ClientSettings {
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            max_retries,
            retry_backoff: Duration::from_millis(10),
        }
    }

    fn test_client(base_url: &str, max_retries: u32) -> OpenAiClient {
        let key = SecretString::from("sk-test".to_string());
        OpenAiClient::new(Some(&key), settings(base_url, max_retries)).unwrap()
    }

    #[tokio::test]
    async fn posts_json_with_bearer_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({"model": "gpt-3.5-turbo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/v1/", server.uri()), 0);
        let reply: serde_json::Value = client
            .post_json("chat/completions", &json!({"model": "gpt-3.5-turbo"}))
            .await
            .unwrap();
        assert_eq!(reply["ok"], true);
    }

    #[tokio::test]
    async fn no_retry_by_default() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 0);
        let err = client
            .post_json::<_, serde_json::Value>("completions", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AvatarError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn retries_transient_status_when_enabled() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached", "type": "requests"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"attempt": 2})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let reply: serde_json::Value = client.post_json("completions", &json!({})).await.unwrap();
        assert_eq!(reply["attempt"], 2);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "The server had an error", "type": "server_error"}
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 2);
        let err = client
            .post_json::<_, serde_json::Value>("completions", &json!({}))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("server_error"), "got: {err}");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 3);
        let err = client
            .post_json::<_, serde_json::Value>("completions", &json!({}))
            .await
            .unwrap_err();
        match err {
            AvatarError::ServiceUnavailable { message, .. } => {
                assert!(message.contains("Incorrect API key"), "got: {message}");
            }
            other => panic!("expected ServiceUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 0);
        let err = client
            .post_json::<_, serde_json::Value>("completions", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AvatarError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let key = SecretString::from("sk-test".to_string());
        let mut settings = settings(&server.uri(), 0);
        settings.request_timeout = Duration::from_millis(200);
        let client = OpenAiClient::new(Some(&key), settings).unwrap();

        let err = client
            .post_json::<_, serde_json::Value>("completions", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AvatarError::ServiceUnavailable { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };

        let client = test_client(&uri, 0);
        let err = client
            .post_json::<_, serde_json::Value>("completions", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AvatarError::ServiceUnavailable { .. }));
    }
}
