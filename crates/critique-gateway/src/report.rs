//! Degrade-to-text wrappers around a [`GenerationGateway`].
//!
//! A failed generation never reaches the presentation layer as an error. The
//! failure becomes a plain-text message placed where the critique would have
//! appeared. Nothing is retried.

use critique_core::GenerationOptions;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};

use crate::client::GatewayError;
use crate::GenerationGateway;

/// User-visible text standing in for a failed generation.
pub fn failure_message(err: &GatewayError) -> String {
    match err {
        GatewayError::MissingApiKey { var } => {
            format!("AI initialization failed. Check {var} in the environment.")
        }
        other => format!("Error generating response: {other}"),
    }
}

/// One-shot generation; on failure, the failure text instead of the result.
pub async fn complete_or_report<G>(
    gateway: &G,
    prompt: &str,
    model: &str,
    options: &GenerationOptions,
) -> String
where
    G: GenerationGateway + ?Sized,
{
    complete_or_failure_text(gateway, prompt, model, options)
        .await
        .unwrap_or_else(|failure| failure)
}

/// One-shot generation that keeps the outcome visible to the caller.
///
/// `Err` carries the user-facing failure text, already logged.
pub async fn complete_or_failure_text<G>(
    gateway: &G,
    prompt: &str,
    model: &str,
    options: &GenerationOptions,
) -> std::result::Result<String, String>
where
    G: GenerationGateway + ?Sized,
{
    gateway
        .complete(prompt, model, options)
        .await
        .map_err(|e| {
            tracing::warn!(
                gateway = gateway.name(),
                model = %model,
                error = %e,
                "Generation failed"
            );
            failure_message(&e)
        })
}

/// Streaming generation that never fails.
///
/// If the stream cannot be opened, it yields only the failure text. If it
/// breaks midway, the failure text is the last fragment.
pub async fn stream_or_report<G>(
    gateway: &G,
    prompt: &str,
    model: &str,
    options: &GenerationOptions,
) -> BoxStream<'static, String>
where
    G: GenerationGateway + ?Sized,
{
    match gateway.complete_streaming(prompt, model, options).await {
        Ok(fragments) => fragments
            .scan(false, |failed, item| {
                if *failed {
                    return future::ready(None);
                }
                future::ready(Some(match item {
                    Ok(text) => text,
                    Err(e) => {
                        *failed = true;
                        failure_message(&e)
                    }
                }))
            })
            .boxed(),
        Err(e) => {
            tracing::warn!(
                gateway = gateway.name(),
                model = %model,
                error = %e,
                "Generation stream failed to open"
            );
            stream::once(future::ready(failure_message(&e))).boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FragmentStream, Result};
    use async_trait::async_trait;

    /// Gateway whose every call fails the same way.
    struct Failing;

    #[async_trait]
    impl GenerationGateway for Failing {
        async fn complete(&self, _: &str, _: &str, _: &GenerationOptions) -> Result<String> {
            Err(GatewayError::Api {
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        async fn complete_streaming(
            &self,
            _: &str,
            _: &str,
            _: &GenerationOptions,
        ) -> Result<FragmentStream> {
            Err(GatewayError::MissingApiKey {
                var: "GEMINI_API_KEY".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Gateway that streams two fragments, then breaks.
    struct Interrupted;

    #[async_trait]
    impl GenerationGateway for Interrupted {
        async fn complete(&self, _: &str, _: &str, _: &GenerationOptions) -> Result<String> {
            Ok("unused".to_string())
        }

        async fn complete_streaming(
            &self,
            _: &str,
            _: &str,
            _: &GenerationOptions,
        ) -> Result<FragmentStream> {
            let items: Vec<Result<String>> = vec![
                Ok("What ".to_string()),
                Ok("if".to_string()),
                Err(GatewayError::Decode("truncated chunk".to_string())),
                Ok("never shown".to_string()),
            ];
            Ok(stream::iter(items).boxed())
        }

        fn name(&self) -> &str {
            "interrupted"
        }
    }

    #[tokio::test]
    async fn complete_failure_becomes_text() {
        let text = complete_or_report(&Failing, "p", "m", &GenerationOptions::default()).await;
        assert!(text.starts_with("Error generating"));
        assert!(text.contains("503"));
    }

    #[tokio::test]
    async fn failure_text_is_kept_apart_from_results() {
        let outcome =
            complete_or_failure_text(&Failing, "p", "m", &GenerationOptions::default()).await;
        let failure = outcome.unwrap_err();
        assert!(failure.starts_with("Error generating response:"));

        let outcome =
            complete_or_failure_text(&Interrupted, "p", "m", &GenerationOptions::default()).await;
        assert_eq!(outcome.as_deref(), Ok("unused"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_text() {
        // Nothing listens on port 9; the request fails at connect time.
        let config = crate::GatewayConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            api_key_env: "GEMINI_API_KEY".to_string(),
        };
        let client = crate::GeminiClient::new(Some("key".to_string()), config).unwrap();
        let text = complete_or_report(&client, "p", "m", &GenerationOptions::default()).await;
        assert!(text.starts_with("Error generating"), "{text}");
    }

    #[tokio::test]
    async fn stream_open_failure_yields_single_message() {
        let fragments: Vec<String> =
            stream_or_report(&Failing, "p", "m", &GenerationOptions::default())
                .await
                .collect()
                .await;
        assert_eq!(fragments.len(), 1);
        assert_eq!(
            fragments[0],
            "AI initialization failed. Check GEMINI_API_KEY in the environment."
        );
    }

    #[tokio::test]
    async fn stream_midway_failure_is_last_fragment() {
        let fragments: Vec<String> =
            stream_or_report(&Interrupted, "p", "m", &GenerationOptions::default())
                .await
                .collect()
                .await;
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0], "What ");
        assert_eq!(fragments[1], "if");
        assert!(fragments[2].starts_with("Error generating response: Malformed response"));
    }
}
