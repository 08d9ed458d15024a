use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("file unavailable: {path}")]
    FileUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("invocation cancelled")]
    Cancelled,

    #[error("unknown block kind: {0}")]
    UnknownBlockKind(String),

    #[error("unbalanced blocks, still open: {open:?}")]
    UnbalancedBlocks { open: Vec<&'static str> },

    #[error("no open block to close")]
    NoOpenBlock,

    #[error("chat stream already terminated")]
    Terminated,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn file_unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        BridgeError::FileUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Short, user-safe label for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::MissingField(_) | BridgeError::InvalidField { .. } => "invalid_payload",
            BridgeError::FileUnavailable { .. } => "file_unavailable",
            BridgeError::ModelUnavailable(_) => "model_unavailable",
            BridgeError::StreamInterrupted(_) => "stream_interrupted",
            BridgeError::Cancelled => "cancelled",
            BridgeError::UnknownBlockKind(_)
            | BridgeError::UnbalancedBlocks { .. }
            | BridgeError::NoOpenBlock
            | BridgeError::Terminated => "protocol",
            BridgeError::Io(_) => "io",
            BridgeError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
