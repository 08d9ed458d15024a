//! Prompt routing and message list construction.

use chatbridge_core::ChatMessage;
use chatbridge_llms::{GenerateOptions, GenerateRequest};

use crate::config::RuntimeConfig;

/// How the user's prompt is combined with editor context.
///
/// Decided once per invocation from the trimmed prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRoute {
    /// Default: the assembled context goes ahead of the history.
    Contextual,
    /// Prompt began with the escape prefix: no file context is attached.
    Raw { directive: String },
}

impl PromptRoute {
    pub const ESCAPE_PREFIX: char = '/';

    pub fn classify(prompt: &str) -> Self {
        match prompt.trim().strip_prefix(Self::ESCAPE_PREFIX) {
            Some(rest) => PromptRoute::Raw {
                directive: rest.trim().to_string(),
            },
            None => PromptRoute::Contextual,
        }
    }

    pub fn attaches_context(&self) -> bool {
        matches!(self, PromptRoute::Contextual)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptRoute::Contextual => "contextual",
            PromptRoute::Raw { .. } => "raw",
        }
    }
}

/// Build the ordered message list for the model.
///
/// - `Contextual`: `[system, user(context), ...history, user(prompt)]`
/// - `Raw`: `[system, ...history, user(prompt)]`
///
/// The prompt is sent exactly as the user typed it in both cases.
pub fn build_messages(
    system_prompt: &str,
    route: &PromptRoute,
    context: &str,
    history: &[ChatMessage],
    prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);

    messages.push(ChatMessage::system(system_prompt));

    if route.attaches_context() {
        messages.push(ChatMessage::user(context));
    }

    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(prompt));

    messages
}

/// Wrap messages in a streaming request using the runtime sampling settings.
pub fn build_generate_request(config: &RuntimeConfig, messages: Vec<ChatMessage>) -> GenerateRequest {
    let options = GenerateOptions::new()
        .temperature(config.temperature)
        .top_p(config.top_p)
        .reasoning_max_tokens(config.reasoning_max_tokens);

    GenerateRequest::new(&config.model, messages).with_options(options)
}
