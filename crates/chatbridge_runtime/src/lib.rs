//! chatbridge runtime: turns one editor invocation into a block-tagged
//! chat stream.
//!
//! ```text
//! EditorSnapshot ─▶ ContextAssembler ─▶ build_messages ─▶ Provider::stream
//!                        │                                     │
//!                        ▼                                     ▼
//!                  ProtocolEmitter ◀──────────────────── StreamingBridge
//!                        │
//!                        ▼
//!                  host (JSON lines)
//! ```
//!
//! - **emitter**: the only writer to the host; owns the open-block stack
//! - **context**: context document, system prompt, message construction
//! - **bridge**: reasoning/answer delta relay with collapse tagging
//! - **invocation**: drives one invocation end to end

pub mod bridge;
pub mod config;
pub mod context;
pub mod emitter;
pub mod invocation;

pub use bridge::{BridgeState, StreamSummary, StreamingBridge};
pub use config::{MissingFilePolicy, RuntimeConfig};
pub use context::{build_messages, build_system_prompt, ContextAssembler, PromptRoute};
pub use emitter::ProtocolEmitter;
pub use invocation::{InvocationReport, PreparedInvocation, Runtime};
