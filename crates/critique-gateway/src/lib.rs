//! critique-gateway: The boundary to the hosted text-generation endpoint.
//!
//! The core only sees [`GenerationGateway`]: a one-shot call and a streaming
//! call producing a finite sequence of text fragments. Failures are never
//! retried here; [`report`] turns them into inline text so a session keeps
//! running when the endpoint is unavailable.

pub mod client;
pub mod report;
pub mod stream;
mod wire;

use async_trait::async_trait;
use critique_core::GenerationOptions;
use futures::stream::BoxStream;

pub use client::{GatewayConfig, GatewayError, GeminiClient};
pub use report::{
    complete_or_failure_text, complete_or_report, failure_message, stream_or_report,
};

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Lazily produced text fragments. Ends when the endpoint finishes or after
/// the first error.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// A text-completion endpoint.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generate the full response text for `prompt`.
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String>;

    /// Generate the response incrementally.
    ///
    /// Fails up front if the request cannot be started; errors after that
    /// arrive as the last item of the stream.
    async fn complete_streaming(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<FragmentStream>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
