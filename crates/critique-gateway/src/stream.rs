//! Server-sent-event decoding for streaming generation.
//!
//! The endpoint answers `streamGenerateContent?alt=sse` with lines of the form
//! `data: {json}`. Each JSON chunk carries zero or more text parts; every
//! non-empty text becomes one fragment.

use std::collections::VecDeque;

use futures::stream::{self, Stream, StreamExt};

use crate::client::GatewayError;
use crate::wire::GenerateResponse;
use crate::{FragmentStream, Result};

/// Incremental line decoder for an SSE body.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw body bytes; returns the fragments completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>> {
        self.buffer.extend_from_slice(bytes);

        let mut fragments = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(fragment) = decode_line(&String::from_utf8_lossy(&line))? {
                fragments.push(fragment);
            }
        }
        Ok(fragments)
    }

    /// Flush a trailing line that had no newline.
    pub fn finish(&mut self) -> Result<Vec<String>> {
        let rest = std::mem::take(&mut self.buffer);
        Ok(decode_line(&String::from_utf8_lossy(&rest))?
            .into_iter()
            .collect())
    }
}

fn decode_line(line: &str) -> Result<Option<String>> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };

    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    let chunk: GenerateResponse =
        serde_json::from_str(data).map_err(|e| GatewayError::Decode(e.to_string()))?;
    if let Some(error) = chunk.error() {
        tracing::debug!(
            code = error.code,
            status = ?error.status,
            "Error chunk in generation stream"
        );
        return Err(GatewayError::Api {
            status: error.code,
            body: error.message.clone(),
        });
    }

    let text = chunk.text();
    Ok((!text.is_empty()).then_some(text))
}

struct DecodeState<S> {
    body: std::pin::Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Turn a byte stream carrying an SSE body into a fragment stream.
///
/// Fragments are produced lazily as bytes arrive. The stream ends at the end
/// of the body, or right after yielding the first error.
pub fn decode_body<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<GatewayError> + Send + 'static,
{
    let state = DecodeState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }

            let decoded = match state.body.next().await {
                Some(Ok(bytes)) => state.decoder.push(bytes.as_ref()),
                Some(Err(e)) => Err(e.into()),
                None => {
                    state.finished = true;
                    state.decoder.finish()
                }
            };

            match decoded {
                Ok(fragments) => state.pending.extend(fragments),
                Err(e) => {
                    tracing::warn!(error = %e, "Generation stream failed");
                    state.finished = true;
                    state.pending.clear();
                    return Some((Err(e), state));
                }
            }
        }
    })
    .boxed()
}
