//! Context and prompt building.
//!
//! Split into focused submodules:
//! - **assemble**: context document from the editor snapshot
//! - **prompt**: system prompt
//! - **messages**: prompt routing and message list construction

mod assemble;
mod messages;
mod prompt;

pub use assemble::ContextAssembler;
pub use messages::{build_generate_request, build_messages, PromptRoute};
pub use prompt::build_system_prompt;
