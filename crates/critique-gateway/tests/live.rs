//! Live tests against the hosted generation endpoint.
//!
//! These tests need a real API key in `GEMINI_API_KEY`.
//! Run with: cargo test --package critique-gateway --test live -- --ignored
//!
//! Skipped automatically if no key is set.

use critique_core::{CritiqueConfig, GenerationOptions};
use critique_gateway::{GeminiClient, GenerationGateway};
use futures::StreamExt;

fn client_or_skip() -> Option<(GeminiClient, CritiqueConfig)> {
    let config = CritiqueConfig::default();
    if config.api_key().is_none() {
        eprintln!("Skipping live test ({} not set)", config.api_key_env);
        return None;
    }
    let client = GeminiClient::from_config(&config).ok()?;
    Some((client, config))
}

fn short_options() -> GenerationOptions {
    GenerationOptions {
        temperature: 0.0,
        max_output_tokens: 32,
    }
}

#[tokio::test]
#[ignore = "requires GEMINI_API_KEY; run with: cargo test --package critique-gateway --test live -- --ignored"]
async fn live_complete_returns_text() {
    let Some((client, config)) = client_or_skip() else {
        return;
    };

    let prompt = "Reply with the single word: ready";
    let text = client
        .complete(prompt, &config.model, &short_options())
        .await
        .unwrap();
    assert!(!text.is_empty());
}

#[tokio::test]
#[ignore = "requires GEMINI_API_KEY; run with: cargo test --package critique-gateway --test live -- --ignored"]
async fn live_streaming_produces_fragments() {
    let Some((client, config)) = client_or_skip() else {
        return;
    };

    let prompt = "Count from one to five in words.";
    let stream = client
        .complete_streaming(prompt, &config.model, &short_options())
        .await
        .unwrap();
    let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect().await;
    assert!(!fragments.is_empty());
}
