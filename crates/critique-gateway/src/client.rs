//! HTTP client for a Gemini-compatible generation API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use critique_core::{CritiqueConfig, GenerationOptions};
use reqwest::Client;

use crate::stream::decode_body;
use crate::wire::{GenerateRequest, GenerateResponse};
use crate::{FragmentStream, GenerationGateway, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors from the generation endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("API key not set: export {var}")]
    MissingApiKey { var: String },

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Configuration for reaching the generation API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Environment variable the API key was read from; named in error text.
    pub api_key_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&CritiqueConfig::default())
    }
}

impl From<&CritiqueConfig> for GatewayConfig {
    fn from(config: &CritiqueConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            api_key_env: config.api_key_env.clone(),
        }
    }
}

/// Client for `generateContent` / `streamGenerateContent`.
///
/// Built without a key it still constructs; every call then fails with
/// [`GatewayError::MissingApiKey`]. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    config: GatewayConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("request_timeout_secs", &self.config.request_timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Client(format!("Failed to create HTTP client: {e}")))?;

        if api_key.is_none() {
            tracing::warn!(
                var = %config.api_key_env,
                "No API key configured; generation will fail"
            );
        }

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Build from the application configuration, reading the key from its environment variable.
    pub fn from_config(config: &CritiqueConfig) -> Result<Self> {
        Self::new(config.api_key(), GatewayConfig::from(config))
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    /// POST one prompt and return the successful response.
    async fn send(
        &self,
        url: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<reqwest::Response> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::MissingApiKey {
                var: self.config.api_key_env.clone(),
            })?;

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&GenerateRequest::single_prompt(prompt, options))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerationGateway for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let start = Instant::now();
        let url = self.endpoint(model, "generateContent");
        tracing::debug!(model = %model, prompt_chars = prompt.len(), "Requesting completion");

        let response = self.send(&url, prompt, options).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        if let Some(error) = body.error() {
            return Err(GatewayError::Api {
                status: error.code,
                body: error.message.clone(),
            });
        }
        let text = body.text().trim().to_string();

        tracing::info!(
            model = %model,
            response_chars = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );
        Ok(text)
    }

    async fn complete_streaming(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<FragmentStream> {
        let url = format!("{}?alt=sse", self.endpoint(model, "streamGenerateContent"));
        tracing::debug!(model = %model, prompt_chars = prompt.len(), "Opening completion stream");

        let response = self.send(&url, prompt, options).await?;
        Ok(decode_body(response.bytes_stream()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockito::Matcher;

    const MODEL: &str = "gemma-3-27b-it";

    fn client_for(server: &mockito::Server, key: Option<&str>) -> GeminiClient {
        let config = GatewayConfig {
            api_base_url: server.url(),
            request_timeout_secs: 5,
            api_key_env: "GEMINI_API_KEY".to_string(),
        };
        GeminiClient::new(key.map(str::to_string), config).unwrap()
    }

    #[tokio::test]
    async fn complete_returns_trimmed_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemma-3-27b-it:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "prompt text"}]}],
                "generationConfig": {"maxOutputTokens": 2000}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"  ## Intent check\n- hypothesis  "}]}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let text = client
            .complete("prompt text", MODEL, &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(text, "## Intent check\n- hypothesis");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn complete_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemma-3-27b-it:generateContent")
            .with_status(429)
            .with_body("quota exceeded")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let err = client
            .complete("p", MODEL, &GenerationOptions::default())
            .await
            .unwrap_err();

        match err {
            GatewayError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn complete_surfaces_error_in_successful_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemma-3-27b-it:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":500,"message":"Internal error","status":"INTERNAL"}}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let err = client
            .complete("p", MODEL, &GenerationOptions::default())
            .await
            .unwrap_err();

        match err {
            GatewayError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "Internal error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client
            .complete("p", MODEL, &GenerationOptions::default())
            .await
            .unwrap_err();

        match err {
            GatewayError::MissingApiKey { var } => assert_eq!(var, "GEMINI_API_KEY"),
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn streaming_yields_fragments() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"What \"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"do you notice?\"}]},\"finishReason\":\"STOP\"}]}\n\n",
        );
        let _mock = server
            .mock("POST", "/models/gemma-3-27b-it:streamGenerateContent")
            .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let stream = client
            .complete_streaming("p", MODEL, &GenerationOptions::default())
            .await
            .unwrap();
        let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect().await;

        assert_eq!(fragments, vec!["What ", "do you notice?"]);
    }

    #[tokio::test]
    async fn streaming_error_chunk_becomes_failure_text() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"What \"}]}}]}\n\n",
            "data: {\"error\":{\"code\":503,\"message\":\"The model is overloaded.\"}}\n\n",
        );
        let _mock = server
            .mock("POST", "/models/gemma-3-27b-it:streamGenerateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let fragments: Vec<String> =
            crate::stream_or_report(&client, "p", MODEL, &GenerationOptions::default())
                .await
                .collect()
                .await;

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], "What ");
        assert!(
            fragments[1].starts_with("Error generating response:"),
            "{}",
            fragments[1]
        );
        assert!(fragments[1].contains("The model is overloaded."));
    }

    #[tokio::test]
    async fn streaming_open_fails_on_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemma-3-27b-it:streamGenerateContent")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let client = client_for(&server, Some("bad-key"));
        let result = client
            .complete_streaming("p", MODEL, &GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(GatewayError::Api { status: 403, .. })));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GatewayConfig::default();
        let client = GeminiClient::new(Some("secret".into()), config).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
