//! Conversion between unified types and OpenAI wire types

use super::types::{
    OpenAIMessage, OpenAIReasoning, OpenAIRequest, OpenAIStreamChunk, OpenAIStreamOptions,
};
use crate::error::{Error, Result};
use crate::types::{GenerateRequest, StreamEvent, Usage};

/// Build a streaming request body.
pub fn to_openai_request(request: &GenerateRequest) -> OpenAIRequest {
    let messages = request
        .messages
        .iter()
        .map(|m| OpenAIMessage {
            role: m.role.as_str().to_string(),
            content: m.content.clone(),
        })
        .collect();

    OpenAIRequest {
        model: request.model.clone(),
        messages,
        stream: true,
        stream_options: Some(OpenAIStreamOptions {
            include_usage: true,
        }),
        temperature: request.options.temperature,
        top_p: request.options.top_p,
        reasoning: request
            .options
            .reasoning_max_tokens
            .map(|max_tokens| OpenAIReasoning { max_tokens }),
    }
}

/// Convert one stream chunk into unified events.
///
/// Within a chunk, reasoning precedes answer text, and usage comes last.
/// Empty deltas produce no events.
pub fn from_stream_chunk(chunk: OpenAIStreamChunk) -> Result<Vec<StreamEvent>> {
    if let Some(error) = chunk.error {
        return Err(Error::stream_error(format!(
            "upstream error mid-stream: {}",
            error.message
        )));
    }

    let mut events = Vec::new();

    for choice in &chunk.choices {
        if let Some(reasoning) = choice.delta.reasoning_text() {
            if !reasoning.is_empty() {
                events.push(StreamEvent::reasoning_delta(reasoning));
            }
        }

        if let Some(ref content) = choice.delta.content {
            if !content.is_empty() {
                events.push(StreamEvent::text_delta(content.clone()));
            }
        }
    }

    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::usage(Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }));
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerateOptions;
    use chatbridge_core::ChatMessage;

    fn chunk(json: &str) -> OpenAIStreamChunk {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body() {
        let request = GenerateRequest::new(
            "anthropic/claude-sonnet-4",
            vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
        )
        .with_options(
            GenerateOptions::new()
                .temperature(1.0)
                .top_p(1.0)
                .reasoning_max_tokens(1500),
        );

        let body = serde_json::to_value(to_openai_request(&request)).unwrap();
        assert_eq!(body["model"], "anthropic/claude-sonnet-4");
        assert_eq!(body["stream"], true);
        assert_eq!(body["stream_options"]["include_usage"], true);
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["top_p"], 1.0);
        assert_eq!(body["reasoning"]["max_tokens"], 1500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_request_body_omits_unset_options() {
        let request = GenerateRequest::new("m", vec![ChatMessage::user("hi")]);
        let body = serde_json::to_value(to_openai_request(&request)).unwrap();
        assert!(body.get("temperature").is_none());
        assert!(body.get("reasoning").is_none());
    }

    #[test]
    fn test_text_delta() {
        let events =
            from_stream_chunk(chunk(r#"{"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#))
                .unwrap();
        assert_eq!(events, vec![StreamEvent::text_delta("Hello")]);
    }

    #[test]
    fn test_reasoning_before_text_in_same_chunk() {
        let events = from_stream_chunk(chunk(
            r#"{"choices":[{"index":0,"delta":{"reasoning":"hmm","content":"ok"}}]}"#,
        ))
        .unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::reasoning_delta("hmm"), StreamEvent::text_delta("ok")]
        );
    }

    #[test]
    fn test_empty_deltas_skipped() {
        let events = from_stream_chunk(chunk(
            r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":"","reasoning":null}}]}"#,
        ))
        .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_usage_last() {
        let events = from_stream_chunk(chunk(
            r#"{"choices":[{"index":0,"delta":{"content":"."},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":3,"total_tokens":13}}"#,
        ))
        .unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], StreamEvent::Usage { usage } if usage.prompt_tokens == 10));
    }

    #[test]
    fn test_error_chunk() {
        let result = from_stream_chunk(chunk(
            r#"{"error":{"message":"overloaded","code":502},"choices":[]}"#,
        ));
        assert!(matches!(result, Err(Error::Stream(ref m)) if m.contains("overloaded")));
    }
}
