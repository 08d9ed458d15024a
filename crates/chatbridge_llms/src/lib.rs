//! chatbridge_llms: streaming chat-completion providers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               ProviderRegistry              │
//! │    BTreeMap<String, Arc<dyn Provider>>      │
//! └──────────────────────┬──────────────────────┘
//!                        ▼
//!              ┌───────────────────┐
//!              │  OpenAIProvider   │  OpenAI-compatible
//!              │  (SSE streaming)  │  /chat/completions
//!              └───────────────────┘
//! ```
//!
//! A provider turns a [`GenerateRequest`] into a [`GenerateStream`] of
//! [`StreamEvent`]s. `stream()` only returns once the upstream connection is
//! open, so connection and auth failures surface as an `Err` from `stream()`
//! and never as an item of the stream.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatbridge_llms::{OpenAIProvider, ProviderRegistry};
//! use chatbridge_llms::providers::openai::OpenAIConfig;
//!
//! let provider = OpenAIProvider::new(
//!     OpenAIConfig::new("sk-...").with_base_url("https://openrouter.ai/api/v1"),
//! ).unwrap();
//! let registry = ProviderRegistry::new().register(provider);
//! assert!(registry.contains("openai"));
//! ```

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;


pub use error::{Error, Result};
pub use provider::{Provider, ProviderRegistry};

pub use providers::OpenAIProvider;

pub use types::{GenerateOptions, GenerateRequest, GenerateStream, Headers, StreamEvent, Usage};
