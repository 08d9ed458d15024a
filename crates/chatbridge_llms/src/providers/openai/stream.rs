//! SSE streaming support
//!
//! The upstream speaks the OpenAI SSE format:
//! - `data: {"choices":[{"delta":{"content":"..."}}]}` for text deltas
//! - `data: {"choices":[{"delta":{"reasoning":"..."}}]}` for reasoning
//! - `data: {"choices":[],"usage":{...}}` once, near the end
//! - `data: [DONE]` to signal stream end

use super::convert::from_stream_chunk;
use super::types::{OpenAIError, OpenAIStreamChunk};
use crate::error::{Error, Result};
use crate::types::{GenerateStream, StreamEvent};
use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

const DONE: &str = "[DONE]";

/// Wait for the connection to open, then wrap the event source as a stream.
///
/// Failures before the connection opens are returned directly so callers can
/// tell "never connected" apart from "broke mid-response".
pub async fn create_stream(mut event_source: EventSource) -> Result<GenerateStream> {
    let mut pending: Option<String> = None;
    match event_source.next().await {
        Some(Ok(Event::Open)) => {}
        Some(Ok(Event::Message(message))) => pending = Some(message.data),
        Some(Err(e)) => {
            event_source.close();
            return Err(open_error(e).await);
        }
        None => {
            return Err(Error::connection_error(
                "event source closed before the connection opened",
            ))
        }
    }

    let stream = async_stream::stream! {
        let mut finished = false;

        if let Some(data) = pending {
            match parse_data(&data) {
                Ok(Some(events)) => {
                    for event in events {
                        yield Ok(event);
                    }
                }
                Ok(None) => finished = true,
                Err(e) => {
                    yield Err(e);
                    finished = true;
                }
            }
        }

        while !finished {
            let Some(event) = event_source.next().await else {
                break;
            };
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => match parse_data(&message.data) {
                    Ok(Some(events)) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    Ok(None) => finished = true,
                    Err(e) => {
                        yield Err(e);
                        finished = true;
                    }
                },
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    tracing::debug!("upstream closed the stream without [DONE]");
                    finished = true;
                }
                Err(e) => {
                    yield Err(Error::stream_error(format!("Stream error: {}", e)));
                    finished = true;
                }
            }
        }

        event_source.close();
    };

    Ok(GenerateStream::new(Box::pin(stream)))
}

/// Parse one `data:` payload. `Ok(None)` marks the end of the stream.
fn parse_data(data: &str) -> Result<Option<Vec<StreamEvent>>> {
    if data.trim() == DONE {
        return Ok(None);
    }

    let chunk: OpenAIStreamChunk = serde_json::from_str(data)
        .map_err(|e| Error::stream_error(format!("Failed to parse chunk: {}", e)))?;
    from_stream_chunk(chunk).map(Some)
}

async fn open_error(error: reqwest_eventsource::Error) -> Error {
    match error {
        reqwest_eventsource::Error::InvalidStatusCode(status, response) => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            Error::provider_error(format!("API error {}: {}", status, detail))
        }
        reqwest_eventsource::Error::InvalidContentType(content_type, _) => Error::provider_error(
            format!("unexpected content type: {:?}", content_type),
        ),
        reqwest_eventsource::Error::Transport(e) => Error::connection_error(e.to_string()),
        other => Error::connection_error(other.to_string()),
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: OpenAIError,
}
