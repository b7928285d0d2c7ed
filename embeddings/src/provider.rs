//! Embedding providers.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{EmbeddingError, Result};
use crate::{Embedding, EMBEDDING_MODEL, MAX_EMBED_CHARS};

/// Default deadline for a single embedding request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for embedding providers.
///
/// Implementations issue at most one service request per `embed` call.
/// Contentless input (empty or whitespace-only after trimming) resolves
/// to `Ok(None)` without touching the network; a provider failure is an
/// `Err`, kept distinct from the absent case so callers can tell "there
/// was nothing to embed" from "the service let us down".
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier used for requests.
    fn model(&self) -> &str;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Option<Embedding>>;
}

/// OpenAI embedding provider.
pub struct OpenAiProvider {
    /// API key.
    api_key: String,

    /// API base URL.
    base_url: String,

    /// Model identifier sent with each request.
    model: String,

    /// Per-request deadline.
    request_timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: EMBEDDING_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Map a transport-level failure, keeping timeouts distinguishable.
fn transport_error(err: reqwest::Error) -> EmbeddingError {
    if err.is_timeout() {
        EmbeddingError::Timeout
    } else {
        EmbeddingError::Http(err)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Option<Embedding>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("skipping embedding request for contentless input");
            return Ok(None);
        }

        let mut input = trimmed;
        if let Some((idx, _)) = trimmed.char_indices().nth(MAX_EMBED_CHARS) {
            debug!(
                "truncating embedding input from {} to {MAX_EMBED_CHARS} chars",
                trimmed.chars().count()
            );
            input = &trimmed[..idx];
        }

        let body = serde_json::json!({
            "input": input,
            "model": self.model,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: EmbeddingResponse = response.json().await.map_err(transport_error)?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding in response".to_string()))?
            .embedding;

        debug!("generated embedding with {} dimensions", embedding.len());

        Ok(Some(embedding))
    }
}

/// Embeddings API response format.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new("test-key").with_base_url(server.uri())
    }

    fn embedding_body(vector: &[f32]) -> serde_json::Value {
        serde_json::json!({
            "data": [{"embedding": vector, "index": 0}],
            "model": EMBEDDING_MODEL,
            "usage": {"prompt_tokens": 1, "total_tokens": 1}
        })
    }

    #[tokio::test]
    async fn embeds_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(&[0.1, 0.2])))
            .mount(&server)
            .await;

        let result = provider(&server).embed("refund policy").await.unwrap();
        assert_eq!(result, Some(vec![0.1, 0.2]));
    }

    #[tokio::test]
    async fn contentless_input_skips_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(&[1.0])))
            .expect(0)
            .mount(&server)
            .await;

        let result = provider(&server).embed("   \n\t ").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn truncates_long_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(&[1.0])))
            .mount(&server)
            .await;

        let long = "a".repeat(MAX_EMBED_CHARS + 5_000);
        provider(&server).embed(&long).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = requests[0].body_json().unwrap();
        let sent = body["input"].as_str().unwrap();
        assert_eq!(sent.len(), MAX_EMBED_CHARS);
    }

    #[tokio::test]
    async fn api_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = provider(&server).embed("hello").await;
        assert!(matches!(result, Err(EmbeddingError::ApiRequest(_))));
    }

    #[tokio::test]
    async fn slow_service_surfaces_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(embedding_body(&[1.0]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let provider = provider(&server).with_timeout(Duration::from_millis(20));
        let result = provider.embed("hello").await;
        assert!(matches!(result, Err(EmbeddingError::Timeout)));
    }

    #[tokio::test]
    async fn rate_limit_reports_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let result = provider(&server).embed("hello").await;
        assert!(matches!(
            result,
            Err(EmbeddingError::RateLimited {
                retry_after_secs: 7
            })
        ));
    }
}
