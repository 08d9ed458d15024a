use serde::{Deserialize, Serialize};

/// One record on the host protocol. Serialized with a `method` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutboundEvent {
    PushChat { content: String },

    ApplyDiff {
        patch: Vec<String>,
        matches: Vec<[usize; 2]>,
    },

    TerminateChat,

    Log { content: String },
}

impl OutboundEvent {
    pub fn push_chat(content: impl Into<String>) -> Self {
        OutboundEvent::PushChat {
            content: content.into(),
        }
    }

    pub fn apply_diff(patch: Vec<String>, matches: Vec<[usize; 2]>) -> Self {
        OutboundEvent::ApplyDiff { patch, matches }
    }

    pub fn terminate_chat() -> Self {
        OutboundEvent::TerminateChat
    }

    pub fn log(content: impl Into<String>) -> Self {
        OutboundEvent::Log {
            content: content.into(),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            OutboundEvent::PushChat { .. } => "push_chat",
            OutboundEvent::ApplyDiff { .. } => "apply_diff",
            OutboundEvent::TerminateChat => "terminate_chat",
            OutboundEvent::Log { .. } => "log",
        }
    }

    /// Chat content carried by a `push_chat` record.
    pub fn chat_content(&self) -> Option<&str> {
        match self {
            OutboundEvent::PushChat { content } => Some(content),
            _ => None,
        }
    }
}
