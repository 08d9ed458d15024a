//! OpenAI-compatible provider module
//!
//! Works against any `/chat/completions` endpoint that speaks the OpenAI SSE
//! streaming format (OpenAI, OpenRouter, DeepSeek, local gateways).

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::OpenAIProvider;
pub use types::OpenAIConfig;
